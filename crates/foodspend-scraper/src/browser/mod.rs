//! Chromium-backed implementations of the page seams.
//!
//! [`BrowserSession`] owns the CDP connection and knows whether the browser
//! process belongs to this run. [`ChromeTable`] adapts a live page to
//! [`TablePage`](crate::page::TablePage) and [`RowReader`](crate::extract::RowReader).

mod session;
mod table;

pub use session::BrowserSession;
pub use table::ChromeTable;

/// The Uber Eats orders view of the privacy data explorer. Its history is the
/// positional `table tbody tr` table the reader expects.
pub const ORDER_HISTORY_URL: &str = "https://myprivacy.uber.com/privacy/exploreyourdata/eats";

#[cfg(test)]
mod tests {
    use super::ORDER_HISTORY_URL;

    #[test]
    fn order_history_targets_the_privacy_export_page() {
        let url = reqwest::Url::parse(ORDER_HISTORY_URL).unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("myprivacy.uber.com"));
        assert!(url.path().starts_with("/privacy/exploreyourdata"));
    }
}
