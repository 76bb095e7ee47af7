//! nbpdata - lazy fetching and single-pass analysis of NBP API data.
//!
//! Items are pulled from an [`source::ItemSource`] block by block through a
//! [`provider::BufferedProvider`], so a range spanning decades is fetched in
//! chunks only as fast as an [`analysis::Analyzer`] consumes it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use nbpdata::analysis::{number_field, Analyzer};
//! use nbpdata::api::{HttpConnector, JsonApi, PayloadShape};
//! use nbpdata::source::{ChunkedRangeSource, Step};
//! use chrono::NaiveDate;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let api: Arc<dyn JsonApi> = Arc::new(HttpConnector::new("http://api.nbp.pl/api/", 30)?);
//! let source = ChunkedRangeSource::new(
//!     api,
//!     NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
//!     Step::days(90),
//!     PayloadShape::list(),
//!     |from, to| format!("cenyzlota/{}/{}", from, to),
//! )?;
//! let average = Analyzer::from_source(source).average(number_field("cena")).await?;
//! println!("{:.4}", average);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod provider;
pub mod source;
