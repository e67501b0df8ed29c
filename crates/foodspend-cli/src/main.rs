mod scrape;
mod summary;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use foodspend_core::Period;

/// Filter applied when the debug toggle is on and `RUST_LOG` is unset.
const DEBUG_FILTER: &str = "info,foodspend_cli=debug,foodspend_scraper=debug,foodspend_core=debug";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "foodspend")]
#[command(about = "Scrape food-delivery order history into the foodspend storage API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the order-history table and post it to the storage API (default)
    Scrape {
        /// Print the extracted orders as JSON instead of posting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print spending buckets from the storage API
    Summary {
        /// Bucket size: week, month or year
        #[arg(long, default_value = "month")]
        period: Period,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = foodspend_core::load_scraper_config()?;
    init_tracing(config.debug)?;

    match cli.command.unwrap_or(Commands::Scrape { dry_run: false }) {
        Commands::Scrape { dry_run } => {
            let ctx = scrape::ScrapeContext::from_config(config)?;
            scrape::run_scrape(&ctx, dry_run).await?;
        }
        Commands::Summary { period } => {
            summary::run_summary(&config, period).await?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
