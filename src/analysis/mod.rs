//! Single-pass analysis over provider streams.

pub mod analyzer;
pub mod spread;

pub use analyzer::{Analyzer, Extremum, MinMax};
pub use spread::KeyedSpread;

use serde_json::Value;

/// Projector reading a numeric field of a JSON object.
pub fn number_field(name: &'static str) -> impl Fn(&Value) -> Option<f64> + Copy {
    move |item: &Value| item.get(name).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_field() {
        let cena = number_field("cena");
        assert_eq!(cena(&json!({"data": "2020-01-02", "cena": 201.5})), Some(201.5));
        assert_eq!(cena(&json!({"cena": 200})), Some(200.0));
        assert_eq!(cena(&json!({"cena": "201.5"})), None);
        assert_eq!(cena(&json!({"mid": 1.0})), None);
        assert_eq!(cena(&json!([1, 2])), None);
    }
}
