//! Command execution.
//!
//! Every command builds its item sources, runs one analysis and returns
//! the text to print.

pub mod currency;
pub mod gold;

use crate::api::{JsonApi, PayloadShape};
use crate::cli::{Command, WeekOfMonth};
use crate::config::Config;
use crate::display::{Highlighter, ProgressSource};
use crate::error::{AnalysisError, FetchError};
use crate::source::{ChunkedRangeSource, ItemSource, Step};
use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Printed whenever the API has nothing for the requested dates.
pub const NO_DATA_MESSAGE: &str = "There is no requested data in NBP database.";

/// Invalid command arguments.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("I don't know how to look into the future :(")]
    FutureDate,

    #[error("First date has to be before second")]
    DateOrder,

    #[error("Week {0} does not exist")]
    InvalidWeek(WeekOfMonth),
}

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub api: Arc<dyn JsonApi>,
    pub config: Config,
    /// Upper bound for requested dates and end of open ranges.
    pub today: NaiveDate,
    pub show_progress: bool,
    pub highlighter: Highlighter,
}

impl Context {
    pub fn new(api: Arc<dyn JsonApi>, config: Config, today: NaiveDate) -> Self {
        let highlighter = Highlighter::new(config.display.color);
        Self {
            api,
            config,
            today,
            show_progress: true,
            highlighter,
        }
    }

    /// Disable the progress spinner.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.show_progress = !quiet;
        self
    }

    fn highlight(&self, text: impl std::fmt::Display) -> String {
        self.highlighter.highlight(text)
    }

    fn ensure_not_future(&self, date: NaiveDate) -> Result<(), CommandError> {
        if date > self.today {
            Err(CommandError::FutureDate)
        } else {
            Ok(())
        }
    }

    fn ensure_ordered(&self, start: NaiveDate, end: NaiveDate) -> Result<(), CommandError> {
        if start > end {
            Err(CommandError::DateOrder)
        } else {
            Ok(())
        }
    }

    /// Chunked source over `start..=end`, behind a spinner unless quiet.
    fn range_source(
        &self,
        label: &str,
        start: NaiveDate,
        end: NaiveDate,
        shape: PayloadShape,
        template: impl Fn(NaiveDate, NaiveDate) -> String + Send + Sync + 'static,
    ) -> Result<Box<dyn ItemSource<Value>>, FetchError> {
        let step = Step::days(self.config.fetch.step_days);
        let source = ChunkedRangeSource::new(self.api.clone(), start, end, step, shape, template)?;

        if self.show_progress {
            Ok(Box::new(ProgressSource::new(source, label)))
        } else {
            Ok(Box::new(source))
        }
    }
}

/// Run a parsed command and return its output.
pub async fn run(command: &Command, ctx: &Context) -> Result<String> {
    match command {
        Command::Gold(gold) => gold::run(gold, ctx).await,
        Command::Currency(currency) => currency::run(currency, ctx).await,
    }
}

/// One line explaining why a command failed.
pub fn describe_error(err: &anyhow::Error) -> String {
    for cause in err.chain() {
        if let Some(fetch) = cause.downcast_ref::<FetchError>() {
            return describe_fetch_error(fetch);
        }
        if let Some(analysis) = cause.downcast_ref::<AnalysisError>() {
            return match analysis {
                AnalysisError::NoData => NO_DATA_MESSAGE.to_string(),
                AnalysisError::Fetch(fetch) => describe_fetch_error(fetch),
                other => format!("Unexpected error: {}", other),
            };
        }
        if let Some(command) = cause.downcast_ref::<CommandError>() {
            return command.to_string();
        }
    }

    format!("Unexpected error: {:#}", err)
}

fn describe_fetch_error(err: &FetchError) -> String {
    match err {
        FetchError::UnexpectedStatus { code: 404, .. } => NO_DATA_MESSAGE.to_string(),
        FetchError::UnexpectedStatus { code, url } => format!(
            "NBP API returned unexpected http status code {} while requesting: {}",
            code, url
        ),
        other => format!("Unexpected error: {}", other),
    }
}
