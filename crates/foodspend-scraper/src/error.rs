use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to attach to browser at {endpoint}: {source}")]
    Attach {
        endpoint: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    #[error("failed to launch browser with profile {}: {reason}", profile_dir.display())]
    Launch { profile_dir: PathBuf, reason: String },

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("invalid browser command: {0}")]
    Command(String),

    #[error("timed out after {timeout_secs}s waiting for \"{selector}\"")]
    TableTimeout {
        selector: &'static str,
        timeout_secs: u64,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API rejected the import with HTTP {status}: {body}")]
    IngestRejected { status: u16, body: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
