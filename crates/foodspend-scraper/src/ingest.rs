//! HTTP client for the storage API's bulk ingest and analytics routes.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use foodspend_core::{ImportSummary, Period, ScrapedOrder, SpendBucket};

use crate::error::ScraperError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("foodspend-scraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The batch was empty, so no request was sent.
    NothingToImport,
    Imported(ImportSummary),
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    orders: &'a [ScrapedOrder],
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Client for the storage API at a fixed base URL.
pub struct IngestClient {
    client: Client,
    base_url: String,
}

impl IngestClient {
    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// A trailing slash on `base_url` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse
    /// as an absolute URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `orders` to `/orders/bulk` as `{"orders": [...]}`.
    ///
    /// An empty slice short-circuits to [`IngestOutcome::NothingToImport`]
    /// without touching the network.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::IngestRejected`]: the API answered with a non-2xx status.
    /// - [`ScraperError::Http`]: network failure or timeout.
    /// - [`ScraperError::Deserialize`]: a 2xx body that is not an import summary.
    pub async fn submit_orders(
        &self,
        orders: &[ScrapedOrder],
    ) -> Result<IngestOutcome, ScraperError> {
        if orders.is_empty() {
            tracing::debug!("no orders to import; skipping request");
            return Ok(IngestOutcome::NothingToImport);
        }

        let url = format!("{}/orders/bulk", self.base_url);
        tracing::debug!(url = %url, count = orders.len(), "posting orders");

        let response = self
            .client
            .post(&url)
            .json(&BulkRequest { orders })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::IngestRejected {
                status: status.as_u16(),
                body,
            });
        }

        let summary =
            serde_json::from_str::<ImportSummary>(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("import summary from {url}"),
                source: e,
            })?;
        tracing::debug!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            "import acknowledged"
        );

        Ok(IngestOutcome::Imported(summary))
    }

    /// Fetches spending buckets for `period` from `/analytics/{period}`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`]: non-2xx response.
    /// - [`ScraperError::Http`]: network failure or timeout.
    /// - [`ScraperError::Deserialize`]: body is not a bucket envelope.
    pub async fn fetch_spending(&self, period: Period) -> Result<Vec<SpendBucket>, ScraperError> {
        let url = format!("{}/analytics/{period}", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let envelope = serde_json::from_str::<DataEnvelope<Vec<SpendBucket>>>(&body).map_err(
            |e| ScraperError::Deserialize {
                context: format!("{period} spending from {url}"),
                source: e,
            },
        )?;

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let client = IngestClient::new("http://127.0.0.1:3001/", 5).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3001");
    }

    #[test]
    fn new_rejects_relative_base_url() {
        let err = IngestClient::new("localhost-without-scheme", 5)
            .err()
            .expect("relative URL should be rejected");
        assert!(matches!(err, ScraperError::InvalidBaseUrl { .. }));
    }

    #[tokio::test]
    async fn empty_batch_short_circuits() {
        // Port 9 is discard; any request attempt would fail rather than hang.
        let client = IngestClient::new("http://127.0.0.1:9", 1).unwrap();
        let outcome = client.submit_orders(&[]).await.unwrap();
        assert_eq!(outcome, IngestOutcome::NothingToImport);
    }
}
