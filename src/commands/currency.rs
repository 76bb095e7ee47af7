//! Exchange rate commands.

use super::{CommandError, Context};
use crate::analysis::{number_field, Analyzer};
use crate::api::PayloadShape;
use crate::cli::{CurrencyCommand, WeekOfMonth};
use crate::display::{pln, BarChart};
use crate::error::AnalysisError;
use crate::models::{decode, MidRate, RateTable, TradingRate, ASK, BID, EFFECTIVE_DATE, MID};
use crate::provider::BufferedProvider;
use crate::source::SingleRequestSource;
use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::info;

pub async fn run(command: &CurrencyCommand, ctx: &Context) -> Result<String> {
    match command {
        CurrencyCommand::Price { code, date } => price(ctx, code, *date).await,
        CurrencyCommand::Fluctuations { date } => fluctuations(ctx, *date).await,
        CurrencyCommand::LowestPrice { date } => lowest_price(ctx, *date).await,
        CurrencyCommand::Difference { date, count } => difference(ctx, *date, *count).await,
        CurrencyCommand::Records { code } => records(ctx, code).await,
        CurrencyCommand::Graph { code, start, end } => graph(ctx, code, *start, *end).await,
    }
}

/// Source of table C (buy and sell rates) for one day.
fn trading_table(ctx: &Context, date: NaiveDate) -> SingleRequestSource {
    SingleRequestSource::new(
        ctx.api.clone(),
        format!("exchangerates/tables/c/{}", date),
        PayloadShape::list_at("/0/rates"),
    )
}

fn rates_endpoint(code: &str) -> impl Fn(NaiveDate, NaiveDate) -> String + Send + Sync + 'static {
    let code = code.to_string();
    move |from, to| format!("exchangerates/rates/a/{}/{}/{}", code, from, to)
}

/// Average rate of one currency on one day.
pub async fn price(ctx: &Context, code: &str, date: NaiveDate) -> Result<String> {
    ctx.ensure_not_future(date)?;
    info!("{} rate on {}", code, date);

    let source = SingleRequestSource::new(
        ctx.api.clone(),
        format!("exchangerates/rates/a/{}/{}", code, date),
        PayloadShape::object_at("/rates"),
    );
    let mut provider = BufferedProvider::new(source);
    let item = provider.take_next().await.map_err(AnalysisError::from)?;
    let rate: MidRate = decode(item).context("Malformed exchange rate")?;

    Ok(format!(
        "Price of {} according to NBP data from {} was {}\n",
        ctx.highlight(format!("1.00 {}", code)),
        rate.effective_date,
        ctx.highlight(format!("{} PLN", rate.mid))
    ))
}

/// Currency whose average rate moved the most between `date` and today.
pub async fn fluctuations(ctx: &Context, date: NaiveDate) -> Result<String> {
    ctx.ensure_not_future(date)?;
    info!("Fluctuations from {} to {}", date, ctx.today);

    let source = ctx.range_source(
        "Exchange rate tables",
        date,
        ctx.today,
        PayloadShape::list(),
        |from, to| format!("exchangerates/tables/a/{}/{}", from, to),
    )?;
    let widest = Analyzer::<Value, _>::from_source(source)
        .spread_by_key(|table| {
            let table: RateTable = decode(table.clone()).ok()?;
            Some(
                table
                    .rates
                    .into_iter()
                    .map(|rate| (rate.code, rate.mid))
                    .collect(),
            )
        })
        .await?
        .ok_or(AnalysisError::NoData)?;

    Ok(format!(
        "Currency with the biggest change in price between {} and {} is {}\n\
         \tMax price  {}\n\
         \tMin price  {}\n\
         \tDifference {}\n",
        date,
        ctx.today,
        ctx.highlight(&widest.key),
        ctx.highlight(pln(widest.max)),
        ctx.highlight(pln(widest.min)),
        ctx.highlight(pln(widest.spread()))
    ))
}

/// Currency with the lowest buy rate on one day.
pub async fn lowest_price(ctx: &Context, date: NaiveDate) -> Result<String> {
    ctx.ensure_not_future(date)?;
    info!("Lowest buy rate on {}", date);

    let lowest = Analyzer::<Value, _>::from_source(trading_table(ctx, date))
        .smallest(number_field(BID))
        .await?
        .ok_or(AnalysisError::NoData)?;
    let rate: TradingRate = decode(lowest).context("Malformed trading rate")?;

    Ok(format!(
        "The currency with the lowest buy price on day {} was {} worth {}\n",
        date,
        ctx.highlight(rate.code.to_uppercase()),
        ctx.highlight(format!("{} PLN", rate.bid))
    ))
}

/// Difference between sell and buy rate, NaN when either is missing.
fn trading_spread(item: &Value) -> f64 {
    match (number_field(ASK)(item), number_field(BID)(item)) {
        (Some(ask), Some(bid)) => ask - bid,
        _ => f64::NAN,
    }
}

/// First `count` currencies ordered by their buy/sell spread.
pub async fn difference(ctx: &Context, date: NaiveDate, count: usize) -> Result<String> {
    ctx.ensure_not_future(date)?;
    info!("{} smallest spreads on {}", count, date);

    let sorted = Analyzer::<Value, _>::from_source(trading_table(ctx, date))
        .sorted(|a, b| trading_spread(a).total_cmp(&trading_spread(b)))
        .await?;

    let mut output = format!(
        "Currencies sorted according to difference between buy and sell price on {}\n\n\t{}\n",
        date,
        ctx.highlight("        BUY       SELL      DIFF  ")
    );

    for item in sorted.into_iter().take(count) {
        let rate: TradingRate = decode(item).context("Malformed trading rate")?;
        output.push_str(&format!(
            "\t{}  {:.6}  {:.6}  {:.6}\n",
            ctx.highlight(&rate.code),
            rate.bid,
            rate.ask,
            rate.spread()
        ));
    }

    Ok(output)
}

/// Highest and lowest average rate of a currency since the first table.
pub async fn records(ctx: &Context, code: &str) -> Result<String> {
    let since = ctx.config.fetch.records_since;
    ctx.ensure_ordered(since, ctx.today)?;
    info!("{} records from {} to {}", code, since, ctx.today);

    let source = ctx.range_source(
        &format!("{} rates", code),
        since,
        ctx.today,
        PayloadShape::object_at("/rates"),
        rates_endpoint(code),
    )?;
    let range = Analyzer::<Value, _>::from_source(source)
        .range(number_field(MID))
        .await?
        .ok_or(AnalysisError::NoData)?;

    let highest: MidRate = decode(range.max).context("Malformed exchange rate")?;
    let lowest: MidRate = decode(range.min).context("Malformed exchange rate")?;

    Ok(format!(
        "Currency {} had the highest value of {} at {}\n\
         Currency {} had the lowest  value of {} at {}\n",
        ctx.highlight(code),
        ctx.highlight(pln(highest.mid)),
        highest.effective_date,
        ctx.highlight(code),
        ctx.highlight(pln(lowest.mid)),
        lowest.effective_date
    ))
}

fn effective_date(item: &Value) -> Option<NaiveDate> {
    item.get(EFFECTIVE_DATE)?.as_str()?.parse().ok()
}

/// Orders by day of the week counted from Sunday, then by date.
fn by_weekday_then_date(a: &Value, b: &Value) -> Ordering {
    let key = |item: &Value| effective_date(item).map(|d| (d.weekday().num_days_from_sunday(), d));
    key(a).cmp(&key(b))
}

/// Bar chart of a currency's rate between the Monday of `start` and the
/// Friday of `end`, grouped by day of the week.
pub async fn graph(ctx: &Context, code: &str, start: WeekOfMonth, end: WeekOfMonth) -> Result<String> {
    let first = start
        .resolve(Weekday::Mon)
        .ok_or(CommandError::InvalidWeek(start))?;
    let last = end.resolve(Weekday::Fri).ok_or(CommandError::InvalidWeek(end))?;
    ctx.ensure_not_future(first)?;
    ctx.ensure_not_future(last)?;
    ctx.ensure_ordered(first, last)?;
    info!("{} graph from {} to {}", code, first, last);

    let source = ctx.range_source(
        &format!("{} rates", code),
        first,
        last,
        PayloadShape::object_at("/rates"),
        rates_endpoint(code),
    )?;
    let sorted = Analyzer::<Value, _>::from_source(source)
        .sorted(by_weekday_then_date)
        .await?;

    let mut chart = BarChart::new();
    for item in sorted {
        let rate: MidRate = decode(item).context("Malformed exchange rate")?;
        let weekday = rate.effective_date.weekday().to_string().to_uppercase();
        chart.push(format!("{} {}", rate.effective_date, weekday), rate.mid);
    }

    if chart.is_empty() {
        return Err(AnalysisError::NoData.into());
    }

    Ok(format!(
        "Price of {} between {} and {}\n\n{}",
        ctx.highlight(format!("1.00 {}", code)),
        first,
        last,
        chart.render(
            ctx.config.display.graph_label_width,
            ctx.config.display.graph_bar_width
        )
    ))
}
