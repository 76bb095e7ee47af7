//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.nbpdata.toml` files.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".nbpdata.toml";

/// Longest span, in days, the NBP API serves in one request is 93 days;
/// a chunk of `step_days` covers `step_days + 1` days.
pub const MAX_STEP_DAYS: u32 = 92;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Chunked fetching settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Output settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL every endpoint is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://api.nbp.pl/api/".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Chunked fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Days added to the start of each chunk to get its end.
    #[serde(default = "default_step_days")]
    pub step_days: u32,

    /// First day the `records` command looks at.
    #[serde(default = "default_records_since")]
    pub records_since: NaiveDate,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            step_days: default_step_days(),
            records_since: default_records_since(),
        }
    }
}

fn default_step_days() -> u32 {
    90
}

fn default_records_since() -> NaiveDate {
    // First table published by the API.
    NaiveDate::from_ymd_opt(2002, 1, 2).unwrap_or_default()
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Highlight values with ANSI escapes.
    #[serde(default = "default_true")]
    pub color: bool,

    /// Label column width of the graph command.
    #[serde(default = "default_graph_label_width")]
    pub graph_label_width: usize,

    /// Bar column width of the graph command.
    #[serde(default = "default_graph_bar_width")]
    pub graph_bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            graph_label_width: default_graph_label_width(),
            graph_bar_width: default_graph_bar_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_graph_label_width() -> usize {
    16
}

fn default_graph_bar_width() -> usize {
    50
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.nbpdata.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(step_days) = args.step_days {
            self.fetch.step_days = step_days;
        }

        // Flags always override
        if args.no_color {
            self.display.color = false;
        }
    }

    /// Check value ranges after merging.
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("API URL must start with 'http://' or 'https://': {}", url);
        }

        if self.api.timeout_seconds == 0 {
            bail!("Timeout must be at least 1 second");
        }

        if !(1..=MAX_STEP_DAYS).contains(&self.fetch.step_days) {
            bail!(
                "step_days must be between 1 and {}, got {}",
                MAX_STEP_DAYS,
                self.fetch.step_days
            );
        }

        if self.display.graph_bar_width == 0 {
            bail!("graph_bar_width must be at least 1");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }

    /// Write the default configuration into `dir`, refusing to overwrite an
    /// existing file.
    pub fn write_default(dir: &Path) -> Result<PathBuf> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            bail!(
                "{} already exists. Remove it first or edit it manually.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, Self::default_toml())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(config_path)
    }
}
