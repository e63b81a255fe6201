//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Checkout configuration
#[derive(Debug, Parser)]
#[command(
    name = "checkout",
    about = "Price a basket against the offers in a fixture set",
    long_about = None
)]
pub struct CheckoutConfig {
    /// Fixture set to load products, offers and baskets from
    #[arg(short, long, env = "CHECKOUT_FIXTURE", default_value = "supermarket")]
    pub fixture: String,

    /// Directory containing the fixture sets
    #[arg(long, env = "CHECKOUT_FIXTURES_PATH", default_value = "./fixtures")]
    pub fixtures_path: PathBuf,

    /// Named basket from the fixture set
    #[arg(short, long)]
    pub basket: Option<String>,

    /// Product codes to scan, comma separated; takes precedence over `--basket`
    #[arg(short, long, value_delimiter = ',')]
    pub items: Vec<String>,

    /// Ignore the fixture offers and charge list prices
    #[arg(long)]
    pub no_offers: bool,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CheckoutConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
