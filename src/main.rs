//! nbpdata - NBP gold and exchange rate analyzer
//!
//! A CLI tool that fetches data from the National Bank of Poland
//! public API and prints prices, averages and rankings.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, missing data or API failure

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::CommandFactory;
use nbpdata::api::{HttpConnector, JsonApi};
use nbpdata::cli::Args;
use nbpdata::commands::{self, Context};
use nbpdata::config::{Config, CONFIG_FILE};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args)?;

    info!("nbpdata v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let Some(ref command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let ctx = match build_context(&args) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Setup failed: {:#}", e);
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    match commands::run(command, &ctx).await {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{}", commands::describe_error(&e));
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .nbpdata.toml.
fn handle_init_config() -> Result<()> {
    if let Err(e) = Config::write_default(std::path::Path::new(".")) {
        eprintln!("⚠️  {:#}", e);
        std::process::exit(1);
    }

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the API URL, chunk size and display.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so command output stays clean. `RUST_LOG` wins over
/// the verbosity flags when set.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Load configuration, apply CLI overrides and connect to the API.
fn build_context(args: &Args) -> Result<Context> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;
    debug!("Effective config: {:?}", config);

    let api: Arc<dyn JsonApi> = Arc::new(HttpConnector::new(
        &config.api.base_url,
        config.api.timeout_seconds,
    )?);

    let today = Local::now().date_naive();
    Ok(Context::new(api, config, today).quiet(args.quiet))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
