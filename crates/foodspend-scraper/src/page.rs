//! The page capabilities the expansion driver needs, independent of any
//! particular browser binding.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScraperError;

/// Rows of the order-history table.
pub const ROW_SELECTOR: &str = "table tbody tr";

/// How long the driver waits for the first row to render before giving up.
pub const TABLE_READY_TIMEOUT: Duration = Duration::from_secs(90);

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A page holding a lazily loaded table that can be nudged toward its end.
#[async_trait]
pub trait TablePage: Send + Sync {
    /// Number of rows currently rendered.
    async fn row_count(&self) -> Result<usize, ScraperError>;

    /// Sends an end-of-document key press.
    async fn press_end(&self) -> Result<(), ScraperError>;

    /// Scrolls the page with a large downward wheel delta.
    async fn scroll_wheel(&self) -> Result<(), ScraperError>;
}

/// Polls until at least one row matches [`ROW_SELECTOR`], returning the row
/// count at that moment.
///
/// Read failures while polling count as "not rendered yet".
///
/// # Errors
///
/// Returns [`ScraperError::TableTimeout`] when no row appears within `timeout`.
pub async fn wait_for_rows<P>(page: &P, timeout: Duration) -> Result<usize, ScraperError>
where
    P: TablePage + ?Sized,
{
    let poll = async {
        loop {
            match page.row_count().await {
                Ok(count) if count > 0 => return count,
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "row count unavailable while waiting"),
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| ScraperError::TableTimeout {
            selector: ROW_SELECTOR,
            timeout_secs: timeout.as_secs(),
        })
}
