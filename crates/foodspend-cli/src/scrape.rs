//! One scrape run: acquire a browser, expand and read the order table, post
//! the result, release the browser.

use std::time::Duration;

use foodspend_core::{ScrapedOrder, ScraperConfig};
use foodspend_scraper::{
    collect_orders, expand_table, wait_for_rows, BrowserSession, ChromeTable, ExpansionPolicy,
    IngestClient, IngestOutcome, RowReader, ScraperError, TablePage, ORDER_HISTORY_URL,
    TABLE_READY_TIMEOUT,
};

/// Everything a run needs, built once from configuration.
pub(crate) struct ScrapeContext {
    pub config: ScraperConfig,
    pub ingest: IngestClient,
    pub policy: ExpansionPolicy,
    pub ready_timeout: Duration,
    pub target_url: &'static str,
}

impl ScrapeContext {
    pub(crate) fn from_config(config: ScraperConfig) -> anyhow::Result<Self> {
        let ingest = IngestClient::new(
            &config.api_base_url,
            foodspend_scraper::ingest::DEFAULT_TIMEOUT_SECS,
        )?;
        Ok(Self {
            config,
            ingest,
            policy: ExpansionPolicy::default(),
            ready_timeout: TABLE_READY_TIMEOUT,
            target_url: ORDER_HISTORY_URL,
        })
    }
}

/// Runs the full pipeline once.
///
/// The session is released whether or not the pipeline succeeds; a release
/// failure is logged and does not mask the pipeline's own result.
pub(crate) async fn run_scrape(ctx: &ScrapeContext, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!(
        attach = ctx.config.is_attach_mode(),
        api = ctx.ingest.base_url(),
        dry_run,
        "starting scrape run"
    );
    let session = BrowserSession::acquire(&ctx.config).await?;
    tracing::info!(owned = session.is_owned(), "browser session acquired");

    let result = scrape_and_publish(ctx, &session, dry_run).await;

    if let Err(e) = session.release().await {
        tracing::warn!(error = %e, "failed to release browser session");
    }
    result
}

async fn scrape_and_publish(
    ctx: &ScrapeContext,
    session: &BrowserSession,
    dry_run: bool,
) -> anyhow::Result<()> {
    session.navigate(ctx.target_url).await?;
    let table = ChromeTable::new(session.page().clone());
    let orders = scrape_table(&table, ctx.ready_timeout, &ctx.policy).await?;
    publish(&ctx.ingest, &orders, dry_run).await
}

/// Waits for the table, expands it, and extracts every valid order.
pub(crate) async fn scrape_table<T>(
    table: &T,
    ready_timeout: Duration,
    policy: &ExpansionPolicy,
) -> Result<Vec<ScrapedOrder>, ScraperError>
where
    T: TablePage + RowReader,
{
    let initial_rows = wait_for_rows(table, ready_timeout).await?;
    tracing::debug!(rows = initial_rows, "order table rendered");

    let report = expand_table(table, policy).await?;
    tracing::info!(
        passes = report.passes,
        rows = report.row_count,
        outcome = ?report.outcome,
        "order table expanded"
    );

    let (orders, summary) = collect_orders(table).await?;
    tracing::info!(
        rows = summary.rows_seen,
        orders = summary.orders,
        skipped = summary.skipped,
        "orders extracted"
    );

    Ok(orders)
}

/// Prints the orders (dry run) or posts them and prints the import summary.
pub(crate) async fn publish(
    ingest: &IngestClient,
    orders: &[ScrapedOrder],
    dry_run: bool,
) -> anyhow::Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(orders)?);
        return Ok(());
    }

    if orders.is_empty() {
        println!("No orders found; nothing to import.");
        return Ok(());
    }

    println!("Scraped {} orders. Posting...", orders.len());
    match ingest.submit_orders(orders).await? {
        IngestOutcome::NothingToImport => println!("No orders found; nothing to import."),
        IngestOutcome::Imported(summary) => {
            println!("Import completed: {}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
