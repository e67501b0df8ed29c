use std::net::SocketAddr;
use std::path::PathBuf;

/// Settings for the scrape driver. These four values are the only
/// environment inputs the driver recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Remote-debugging endpoint of an already running browser. When set the
    /// driver attaches instead of launching.
    pub cdp_url: Option<String>,
    /// Persistent profile directory used in launch mode.
    pub profile_dir: PathBuf,
    /// Base URL of the storage API, e.g. `http://127.0.0.1:3001`.
    pub api_base_url: String,
    pub debug: bool,
}

impl ScraperConfig {
    /// Returns `true` when the driver should attach to an externally
    /// supervised browser rather than launch its own.
    #[must_use]
    pub fn is_attach_mode(&self) -> bool {
        self.cdp_url.is_some()
    }
}

/// Settings for the storage API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
}
