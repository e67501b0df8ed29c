use foodspend_core::{Period, ScraperConfig, SpendBucket};
use foodspend_scraper::IngestClient;

pub(crate) async fn run_summary(config: &ScraperConfig, period: Period) -> anyhow::Result<()> {
    let client = IngestClient::new(
        &config.api_base_url,
        foodspend_scraper::ingest::DEFAULT_TIMEOUT_SECS,
    )?;
    let buckets = client.fetch_spending(period).await?;

    if buckets.is_empty() {
        println!("No orders stored yet.");
        return Ok(());
    }

    for line in render_buckets(&buckets) {
        println!("{line}");
    }
    Ok(())
}

fn render_buckets(buckets: &[SpendBucket]) -> Vec<String> {
    buckets
        .iter()
        .map(|b| {
            format!(
                "{:<8}  {:>4} orders  ${:>10.2}  avg ${:.2}",
                b.label, b.order_count, b.total_spend, b.average_per_order
            )
        })
        .collect()
}
