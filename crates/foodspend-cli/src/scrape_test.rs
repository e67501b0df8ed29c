use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use foodspend_scraper::{row_cells, RowCells, RowField, RowRejection};

use super::*;

fn instant_policy() -> ExpansionPolicy {
    ExpansionPolicy {
        settle: Duration::ZERO,
        final_settle: Duration::ZERO,
        ..ExpansionPolicy::default()
    }
}

/// A table that reveals one more row per nudge until all rows are visible.
struct LazyTable {
    rows: Vec<Vec<&'static str>>,
    visible: AtomicUsize,
}

impl LazyTable {
    fn new(rows: Vec<Vec<&'static str>>, initially_visible: usize) -> Self {
        Self {
            rows,
            visible: AtomicUsize::new(initially_visible),
        }
    }
}

#[async_trait]
impl TablePage for LazyTable {
    async fn row_count(&self) -> Result<usize, ScraperError> {
        Ok(self.visible.load(Ordering::SeqCst))
    }

    async fn press_end(&self) -> Result<(), ScraperError> {
        let total = self.rows.len();
        let _ = self
            .visible
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                (v < total).then_some(v + 1)
            });
        Ok(())
    }

    async fn scroll_wheel(&self) -> Result<(), ScraperError> {
        Err(ScraperError::Command("wheel unsupported".to_string()))
    }
}

#[async_trait]
impl RowReader for LazyTable {
    type Row = Vec<&'static str>;

    async fn rows(&self) -> Result<Vec<Self::Row>, ScraperError> {
        let visible = self.visible.load(Ordering::SeqCst);
        Ok(self.rows.iter().take(visible).cloned().collect())
    }

    async fn read_row(&self, row: &Self::Row) -> Result<RowCells, RowRejection> {
        let texts = row.iter().map(|t| RowField::Present((*t).to_string())).collect();
        let nested = row.get(1).map(|t| (*t).to_string()).into();
        row_cells(texts, nested)
    }
}

fn example_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Feb 22, 2026, 10:09:13 AM", "Example", "Delivered", "2 items", "$24.99"],
        vec!["bad row", "2 cells"],
        vec!["Feb 20, 2026, 7:41:02 PM", "Pho Saigon", "Delivered", "1 item", "$18.50"],
    ]
}

fn example_order() -> ScrapedOrder {
    ScrapedOrder::new(
        "Example".to_string(),
        "Feb 22, 2026, 10:09:13 AM".to_string(),
        Decimal::new(2499, 2),
    )
}

// ---------------------------------------------------------------------------
// scrape_table
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_table_expands_then_extracts_every_valid_row() {
    let table = LazyTable::new(example_rows(), 1);

    let orders = scrape_table(&table, Duration::from_secs(1), &instant_policy())
        .await
        .unwrap();

    let signatures: Vec<&str> = orders.iter().map(|o| o.source_signature.as_str()).collect();
    assert_eq!(
        signatures,
        vec![
            "Example__Feb 22, 2026, 10:09:13 AM__24.99",
            "Pho Saigon__Feb 20, 2026, 7:41:02 PM__18.5",
        ]
    );
}

#[tokio::test]
async fn scrape_table_times_out_when_no_rows_render() {
    let table = LazyTable::new(Vec::new(), 0);

    let err = scrape_table(&table, Duration::from_millis(50), &instant_policy())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::TableTimeout { .. }),
        "expected TableTimeout, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_posts_orders_to_bulk_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/bulk"))
        .and(body_json(json!({
            "orders": [{
                "restaurantName": "Example",
                "totalPrice": 24.99,
                "orderedAtText": "Feb 22, 2026, 10:09:13 AM",
                "sourceSignature": "Example__Feb 22, 2026, 10:09:13 AM__24.99"
            }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "inserted": 1,
            "skipped": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ingest = IngestClient::new(&server.uri(), 5).unwrap();
    publish(&ingest, &[example_order()], false).await.unwrap();
}

#[tokio::test]
async fn publish_dry_run_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ingest = IngestClient::new(&server.uri(), 5).unwrap();
    publish(&ingest, &[example_order()], true).await.unwrap();
}

#[tokio::test]
async fn publish_with_no_orders_posts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ingest = IngestClient::new(&server.uri(), 5).unwrap();
    publish(&ingest, &[], false).await.unwrap();
}

#[tokio::test]
async fn publish_fails_when_api_rejects_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/bulk"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .mount(&server)
        .await;

    let ingest = IngestClient::new(&server.uri(), 5).unwrap();
    let err = publish(&ingest, &[example_order()], false)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err.downcast_ref::<ScraperError>(),
            Some(ScraperError::IngestRejected { status: 400, .. })
        ),
        "expected IngestRejected, got: {err:?}"
    );
}
