//! Turns rendered table rows into [`ScrapedOrder`]s.
//!
//! The order-history table is read by column position, not by header text:
//!
//! | column | content |
//! |--------|---------|
//! | 0 | order timestamp, e.g. `Feb 22, 2026, 10:09:13 AM` |
//! | 1 | restaurant name, inside a nested `div div` container |
//! | 4 | total price with a currency symbol, e.g. `$24.99` |
//!
//! The positional contract lives behind [`RowReader`] so a layout change only
//! touches the reader implementation. Rows that do not satisfy the contract
//! are skipped with a [`RowRejection`]; they never abort the run.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use thiserror::Error;

use foodspend_core::{normalize_whitespace, parse_price, ScrapedOrder};

use crate::error::ScraperError;

/// Minimum number of cells a row must have to reach the price column.
pub const MIN_COLUMNS: usize = 5;

/// Result of reading one piece of text out of the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowField {
    Present(String),
    Absent,
}

impl RowField {
    /// Normalized text, or an empty string when absent.
    #[must_use]
    pub fn normalized(&self) -> String {
        match self {
            RowField::Present(raw) => normalize_whitespace(raw),
            RowField::Absent => String::new(),
        }
    }
}

impl From<Option<String>> for RowField {
    fn from(value: Option<String>) -> Self {
        value.map_or(RowField::Absent, RowField::Present)
    }
}

/// The positional fields of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub ordered_at: RowField,
    /// Text of the nested container in the name column.
    pub restaurant: RowField,
    /// Full text of the name column, used when the nested container is empty.
    pub restaurant_cell: RowField,
    pub price: RowField,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("row has {found} columns, expected at least 5")]
    TooFewColumns { found: usize },

    #[error("order timestamp is empty")]
    EmptyTimestamp,

    #[error("restaurant name is empty")]
    EmptyRestaurant,

    #[error("price \"{raw}\" could not be parsed")]
    UnparseablePrice { raw: String },

    #[error("row could not be read: {0}")]
    Unreadable(String),
}

/// Column holding the order timestamp.
const TIMESTAMP_COLUMN: usize = 0;
/// Column holding the restaurant name.
const RESTAURANT_COLUMN: usize = 1;
/// Column holding the order total.
const PRICE_COLUMN: usize = 4;

/// Maps the raw cell texts of one row onto the positional contract.
///
/// `nested_name` is the text of the name container inside the restaurant
/// column, read separately because the cell itself also carries badges.
///
/// # Errors
///
/// Returns [`RowRejection::TooFewColumns`] when the row cannot reach the
/// price column.
pub fn row_cells(
    mut cells: Vec<RowField>,
    nested_name: RowField,
) -> Result<RowCells, RowRejection> {
    if cells.len() < MIN_COLUMNS {
        return Err(RowRejection::TooFewColumns { found: cells.len() });
    }

    let mut take = |index: usize| std::mem::replace(&mut cells[index], RowField::Absent);

    Ok(RowCells {
        ordered_at: take(TIMESTAMP_COLUMN),
        restaurant: nested_name,
        restaurant_cell: take(RESTAURANT_COLUMN),
        price: take(PRICE_COLUMN),
    })
}

/// Reads positional cells out of table rows.
#[async_trait]
pub trait RowReader: Send + Sync {
    type Row: Send + Sync;

    /// Handles for every row currently in the table, top to bottom.
    async fn rows(&self) -> Result<Vec<Self::Row>, ScraperError>;

    /// Reads the positional cells of `row`, or rejects it when the row does
    /// not have the expected shape. Implementations read the raw cell texts
    /// and hand them to [`row_cells`].
    async fn read_row(&self, row: &Self::Row) -> Result<RowCells, RowRejection>;
}

/// Validates and normalizes one row's cells into an order.
///
/// # Errors
///
/// Returns the [`RowRejection`] describing the first field that failed.
pub fn extract_order(cells: &RowCells) -> Result<ScrapedOrder, RowRejection> {
    let ordered_at = cells.ordered_at.normalized();
    if ordered_at.is_empty() {
        return Err(RowRejection::EmptyTimestamp);
    }

    let mut restaurant = cells.restaurant.normalized();
    if restaurant.is_empty() {
        restaurant = cells.restaurant_cell.normalized();
    }
    if restaurant.is_empty() {
        return Err(RowRejection::EmptyRestaurant);
    }

    let raw_price = cells.price.normalized();
    let Some(price) = parse_price(&raw_price) else {
        return Err(RowRejection::UnparseablePrice { raw: raw_price });
    };

    Ok(ScrapedOrder::new(restaurant, ordered_at, price))
}

/// Lazily reads `rows` in order and yields the valid orders.
///
/// The stream is single-pass: each row is read from the page once, when the
/// stream reaches it. Rejected rows are logged at debug level and skipped.
pub fn extract_orders<'a, R>(
    reader: &'a R,
    rows: Vec<R::Row>,
) -> impl Stream<Item = ScrapedOrder> + Send + 'a
where
    R: RowReader + ?Sized,
    R::Row: 'a,
{
    stream::iter(rows.into_iter().enumerate())
        .then(move |(index, row)| async move {
            let read = reader.read_row(&row).await;
            (index, read)
        })
        .filter_map(|(index, read)| async move {
            match read.and_then(|cells| extract_order(&cells)) {
                Ok(order) => Some(order),
                Err(reason) => {
                    tracing::debug!(row = index, %reason, "skipping row");
                    None
                }
            }
        })
}

/// Counts from one extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub rows_seen: usize,
    pub orders: usize,
    pub skipped: usize,
}

/// Reads every row currently in the table and collects the valid orders.
///
/// # Errors
///
/// Propagates a failure to list the table rows. Individual row failures are
/// skipped, not returned.
pub async fn collect_orders<R>(
    reader: &R,
) -> Result<(Vec<ScrapedOrder>, ExtractionSummary), ScraperError>
where
    R: RowReader + ?Sized,
{
    let rows = reader.rows().await?;
    let rows_seen = rows.len();

    let orders: Vec<ScrapedOrder> = extract_orders(reader, rows).collect().await;

    let summary = ExtractionSummary {
        rows_seen,
        orders: orders.len(),
        skipped: rows_seen.saturating_sub(orders.len()),
    };
    tracing::debug!(
        rows = summary.rows_seen,
        orders = summary.orders,
        skipped = summary.skipped,
        "extraction finished"
    );

    Ok((orders, summary))
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
