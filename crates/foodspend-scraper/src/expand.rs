//! Drives a lazily loaded table until it has rendered its full history.
//!
//! Each pass nudges the page toward the bottom (End key plus a large wheel
//! scroll), waits for the page to settle, and re-reads the row count. A
//! single flat read is weak evidence under network or render jitter, so the
//! table only counts as complete after several consecutive passes without
//! growth. A hard pass cap bounds the run if the table never settles.

use std::time::Duration;

use crate::error::ScraperError;
use crate::page::TablePage;

/// Timing and stopping rules for [`expand_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Upper bound on nudge passes regardless of stability.
    pub max_passes: u32,
    /// Consecutive no-growth passes that end expansion.
    pub stable_passes: u32,
    /// Pause between a nudge and the following row count read.
    pub settle: Duration,
    /// Pause after the loop ends, before extraction may start.
    pub final_settle: Duration,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self {
            max_passes: 240,
            stable_passes: 3,
            settle: Duration::from_millis(1500),
            final_settle: Duration::from_secs(10),
        }
    }
}

/// Why the expansion loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// Row count stopped growing for `stable_passes` passes in a row.
    Stabilized,
    /// `max_passes` was reached first.
    PassLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionReport {
    pub passes: u32,
    pub row_count: usize,
    pub outcome: ExpansionOutcome,
}

/// Expands the table on `page` according to `policy`.
///
/// Nudge failures are ignored; either nudge succeeding is enough to trigger
/// the next page load.
///
/// # Errors
///
/// Propagates a failure to read the row count.
pub async fn expand_table<P>(
    page: &P,
    policy: &ExpansionPolicy,
) -> Result<ExpansionReport, ScraperError>
where
    P: TablePage + ?Sized,
{
    let mut previous = page.row_count().await?;
    let mut stable = 0u32;
    let mut passes = 0u32;
    let mut outcome = ExpansionOutcome::PassLimit;

    tracing::debug!(rows = previous, "starting table expansion");

    while passes < policy.max_passes {
        passes += 1;

        let _ = page.press_end().await;
        let _ = page.scroll_wheel().await;
        tokio::time::sleep(policy.settle).await;

        let current = page.row_count().await?;
        if current > previous {
            tracing::debug!(
                pass = passes,
                rows = current,
                added = current - previous,
                "table grew"
            );
            previous = current;
            stable = 0;
        } else {
            stable += 1;
            tracing::debug!(pass = passes, rows = current, stable, "no growth");
            if stable >= policy.stable_passes {
                outcome = ExpansionOutcome::Stabilized;
                break;
            }
        }
    }

    tracing::debug!(passes, rows = previous, ?outcome, "table expansion finished");
    tokio::time::sleep(policy.final_settle).await;

    Ok(ExpansionReport {
        passes,
        row_count: previous,
        outcome,
    })
}
