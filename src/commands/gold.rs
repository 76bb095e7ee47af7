//! Gold price commands.

use super::Context;
use crate::analysis::{number_field, Analyzer};
use crate::api::PayloadShape;
use crate::cli::GoldCommand;
use crate::display::pln;
use crate::error::AnalysisError;
use crate::models::{decode, GoldPrice, GOLD_PRICE};
use crate::provider::BufferedProvider;
use crate::source::SingleRequestSource;
use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

const GOLD: &str = "1g GOLD";

pub async fn run(command: &GoldCommand, ctx: &Context) -> Result<String> {
    match command {
        GoldCommand::Price { date } => price(ctx, *date).await,
        GoldCommand::Average { start, end } => average(ctx, *start, *end).await,
    }
}

/// Price of gold published for one day.
pub async fn price(ctx: &Context, date: NaiveDate) -> Result<String> {
    ctx.ensure_not_future(date)?;
    info!("Gold price on {}", date);

    let source = SingleRequestSource::new(
        ctx.api.clone(),
        format!("cenyzlota/{}", date),
        PayloadShape::list(),
    );
    let mut provider = BufferedProvider::new(source);
    let item = provider.take_next().await.map_err(AnalysisError::from)?;
    let quote: GoldPrice = decode(item).context("Malformed gold price")?;

    Ok(format!(
        "Price of {} according to NBP data from {} was {}\n",
        ctx.highlight(GOLD),
        quote.date,
        ctx.highlight(format!("{} PLN", quote.price))
    ))
}

/// Average gold price over an inclusive date range.
pub async fn average(ctx: &Context, start: NaiveDate, end: NaiveDate) -> Result<String> {
    ctx.ensure_not_future(start)?;
    ctx.ensure_not_future(end)?;
    ctx.ensure_ordered(start, end)?;
    info!("Average gold price from {} to {}", start, end);

    let source = ctx.range_source("Gold prices", start, end, PayloadShape::list(), |from, to| {
        format!("cenyzlota/{}/{}", from, to)
    })?;
    let average = Analyzer::<Value, _>::from_source(source)
        .average(number_field(GOLD_PRICE))
        .await?;

    Ok(format!(
        "Average price of {} between {} and {} was {}\n",
        ctx.highlight(GOLD),
        start,
        end,
        ctx.highlight(pln(average))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeApi;
    use crate::commands::tests::{context, date};
    use crate::commands::{describe_error, NO_DATA_MESSAGE};
    use serde_json::json;
    use tokio_test::block_on;

    #[test]
    fn test_price() {
        let api = FakeApi::new().with_payload(
            "cenyzlota/2020-01-02",
            json!([{"data": "2020-01-02", "cena": 201.59}]),
        );
        let output = block_on(price(&context(api), date("2020-01-02"))).unwrap();

        assert_eq!(
            output,
            "Price of 1g GOLD according to NBP data from 2020-01-02 was 201.59 PLN\n"
        );
    }

    #[test]
    fn test_price_missing_day() {
        let api = FakeApi::new().with_status("cenyzlota/2020-01-01", 404);
        let err = block_on(price(&context(api), date("2020-01-01"))).unwrap_err();

        assert_eq!(describe_error(&err), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_price_in_future() {
        let err = block_on(price(&context(FakeApi::new()), date("2021-01-01"))).unwrap_err();
        assert_eq!(describe_error(&err), "I don't know how to look into the future :(");
    }

    #[test]
    fn test_average_over_chunks() {
        let api = FakeApi::new()
            .with_payload(
                "cenyzlota/2020-01-01/2020-03-31",
                json!([{"data": "2020-01-02", "cena": 200.0}, {"data": "2020-03-31", "cena": 210.0}]),
            )
            .with_payload(
                "cenyzlota/2020-04-01/2020-04-15",
                json!([{"data": "2020-04-15", "cena": 220.0}]),
            );
        let ctx = context(api);

        let output = block_on(average(&ctx, date("2020-01-01"), date("2020-04-15"))).unwrap();

        assert_eq!(
            output,
            "Average price of 1g GOLD between 2020-01-01 and 2020-04-15 was 210.0000 PLN\n"
        );
    }

    #[test]
    fn test_average_rejects_reversed_range() {
        let err =
            block_on(average(&context(FakeApi::new()), date("2020-02-01"), date("2020-01-01")))
                .unwrap_err();
        assert_eq!(describe_error(&err), "First date has to be before second");
    }

    #[test]
    fn test_average_without_data() {
        let api = FakeApi::new().with_payload("cenyzlota/2020-01-01/2020-01-01", json!([]));
        let err = block_on(average(&context(api), date("2020-01-01"), date("2020-01-01"))).unwrap_err();

        assert_eq!(describe_error(&err), NO_DATA_MESSAGE);
    }
}
