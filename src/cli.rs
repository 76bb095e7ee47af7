//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and the date and currency formats the
//! commands accept.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;

use crate::config::MAX_STEP_DAYS;

/// nbpdata - gold prices and exchange rates from the NBP public API
///
/// Looks up, averages and compares data published by the National Bank
/// of Poland. Long date ranges are fetched in chunks as the analysis
/// consumes them.
///
/// Examples:
///   nbpdata gold price 2020-01-02
///   nbpdata gold average 2019-01-01 2019-12-31
///   nbpdata currency price usd 2020-01-02
///   nbpdata currency difference 2020-01-02 5
///   nbpdata currency graph EUR 2020,1,2 2020,2,1
///   nbpdata --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .nbpdata.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// NBP API root URL
    #[arg(long, value_name = "URL", env = "NBPDATA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Days between the start and the end of one chunked request
    ///
    /// The API serves at most 93 days per request.
    #[arg(long, value_name = "DAYS", global = true)]
    pub step_days: Option<u32>,

    /// Print values without ANSI highlighting
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (no progress spinner, errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .nbpdata.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Information about gold prices based on NBP data
    #[command(subcommand)]
    Gold(GoldCommand),

    /// Information about currency exchange rates based on NBP data
    #[command(subcommand)]
    Currency(CurrencyCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum GoldCommand {
    /// Displays price of gold from given date
    Price {
        /// Date in ISO 8601 format (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Displays average price of gold in given time range
    Average {
        /// First day, ISO 8601 (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        start: NaiveDate,
        /// Last day, ISO 8601 (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        end: NaiveDate,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CurrencyCommand {
    /// Displays price of specified currency from given date
    Price {
        /// Currency code, ISO 4217 (XXX)
        #[arg(value_parser = parse_currency_code)]
        code: String,
        /// Date in ISO 8601 format (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Displays the currency with the biggest fluctuation starting from given date
    Fluctuations {
        /// Date in ISO 8601 format (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Displays the currency with the lowest buy rate at given date
    LowestPrice {
        /// Date in ISO 8601 format (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Displays N currencies sorted by difference in buy and sell prices
    Difference {
        /// Date in ISO 8601 format (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Number of currencies to list
        #[arg(value_name = "N")]
        count: usize,
    },

    /// Displays the lowest and the highest price of a currency
    Records {
        /// Currency code, ISO 4217 (XXX)
        #[arg(value_parser = parse_currency_code)]
        code: String,
    },

    /// Displays a graph of a currency price in given time frame
    ///
    /// Bars are grouped by day of the week.
    Graph {
        /// Currency code, ISO 4217 (XXX)
        #[arg(value_parser = parse_currency_code)]
        code: String,
        /// Starting week, <year>,<month>,<week in month>
        #[arg(value_parser = parse_week_of_month)]
        start: WeekOfMonth,
        /// Ending week, <year>,<month>,<week in month>
        #[arg(value_parser = parse_week_of_month)]
        end: WeekOfMonth,
    },
}

/// A week given as `<year>,<month>,<week in month>`.
///
/// Weeks start on Monday and week 1 is the one holding the first day of
/// the month, so it may begin in the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOfMonth {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl WeekOfMonth {
    /// Day of this week that falls on `weekday`.
    pub fn resolve(&self, weekday: Weekday) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let monday =
            first.checked_sub_days(Days::new(u64::from(first.weekday().num_days_from_monday())))?;
        let weeks = u64::from(self.week.checked_sub(1)?);
        let offset = weeks * 7 + u64::from(weekday.num_days_from_monday());
        monday.checked_add_days(Days::new(offset))
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.year, self.month, self.week)
    }
}

/// Parse an ISO 8601 calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| "Wrong date format, expected: ISO 8601 (YYYY-MM-DD)".to_string())
}

/// Parse a three letter currency code, upper-casing it.
pub fn parse_currency_code(text: &str) -> Result<String, String> {
    let code = text.trim().to_uppercase();

    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err("Wrong currency format, expected: ISO 4217 (XXX)".to_string())
    }
}

/// Parse `<year>,<month>,<week in month>`.
pub fn parse_week_of_month(text: &str) -> Result<WeekOfMonth, String> {
    let error = || "Wrong date format, expected: <year>,<month>,<week in month>".to_string();

    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [year, month, week] = parts.as_slice() else {
        return Err(error());
    };

    let week = WeekOfMonth {
        year: year.parse().map_err(|_| error())?,
        month: month.parse().map_err(|_| error())?,
        week: week.parse().map_err(|_| error())?,
    };

    if !(1..=12).contains(&week.month) || !(1..=6).contains(&week.week) {
        return Err(error());
    }
    if week.resolve(Weekday::Mon).is_none() {
        return Err(error());
    }

    Ok(week)
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(step_days) = self.step_days {
            if !(1..=MAX_STEP_DAYS).contains(&step_days) {
                return Err(format!("Step must be between 1 and {} days", MAX_STEP_DAYS));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}
