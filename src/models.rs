//! Records served by the NBP API.
//!
//! The pipeline works on raw JSON values. These types are only used to
//! present the handful of items an analysis picked out.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Price of one gram of gold (`cena`).
pub const GOLD_PRICE: &str = "cena";
/// Average exchange rate, tables A and B.
pub const MID: &str = "mid";
/// Buy rate, table C.
pub const BID: &str = "bid";
/// Sell rate, table C.
pub const ASK: &str = "ask";
pub const EFFECTIVE_DATE: &str = "effectiveDate";

/// Gold price quote from `cenyzlota`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldPrice {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "cena")]
    pub price: f64,
}

/// One day of a single currency's average rate (`exchangerates/rates/a`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidRate {
    pub no: String,
    pub effective_date: NaiveDate,
    pub mid: f64,
}

/// Entry of an average-rate table (`exchangerates/tables/a`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRate {
    pub currency: String,
    pub code: String,
    pub mid: f64,
}

/// Entry of the buy/sell table (`exchangerates/tables/c`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingRate {
    pub currency: String,
    pub code: String,
    pub bid: f64,
    pub ask: f64,
}

impl TradingRate {
    /// Difference between the sell and the buy rate.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// One published rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub table: String,
    pub no: String,
    pub effective_date: NaiveDate,
    pub rates: Vec<TableRate>,
}

/// Decode an item picked from the stream into a typed record.
pub fn decode<T: DeserializeOwned>(item: Value) -> serde_json::Result<T> {
    serde_json::from_value(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_gold_price() {
        let price: GoldPrice = decode(json!({"data": "2020-01-02", "cena": 201.59})).unwrap();
        assert_eq!(price.date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(price.price, 201.59);
    }

    #[test]
    fn test_decode_mid_rate() {
        let rate: MidRate = decode(json!({
            "no": "001/A/NBP/2020",
            "effectiveDate": "2020-01-02",
            "mid": 3.7976
        }))
        .unwrap();
        assert_eq!(rate.no, "001/A/NBP/2020");
        assert_eq!(rate.mid, 3.7976);
    }

    #[test]
    fn test_decode_rate_table() {
        let table: RateTable = decode(json!({
            "table": "A",
            "no": "001/A/NBP/2020",
            "effectiveDate": "2020-01-02",
            "rates": [
                {"currency": "dolar amerykański", "code": "USD", "mid": 3.7976},
                {"currency": "euro", "code": "EUR", "mid": 4.2571}
            ]
        }))
        .unwrap();
        assert_eq!(table.rates.len(), 2);
        assert_eq!(table.rates[1].code, "EUR");
    }

    #[test]
    fn test_trading_rate_spread() {
        let rate: TradingRate = decode(json!({
            "currency": "euro",
            "code": "EUR",
            "bid": 4.2,
            "ask": 4.3
        }))
        .unwrap();
        assert!((rate.spread() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_decode_missing_field() {
        assert!(decode::<GoldPrice>(json!({"data": "2020-01-02"})).is_err());
    }
}
