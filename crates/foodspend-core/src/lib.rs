pub mod analytics;
mod app_config;
mod config;
pub mod normalize;
mod order;

use thiserror::Error;

pub use analytics::{build_buckets, parse_order_date, Period, SpendBucket};
pub use app_config::{ScraperConfig, ServerConfig};
pub use config::{
    load_scraper_config, load_scraper_config_from_env, load_server_config,
    load_server_config_from_env,
};
pub use normalize::{normalize_whitespace, parse_price};
pub use order::{build_signature, ImportSummary, OrderRecord, ScrapedOrder, SIGNATURE_DELIMITER};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
