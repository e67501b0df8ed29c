//! Database operations for the `orders` table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use foodspend_core::{ImportSummary, OrderRecord, ScrapedOrder};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `orders` table. Prices are stored as decimal text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub restaurant_name: String,
    pub total_price: String,
    pub ordered_at_text: String,
    pub source_signature: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DbError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let total_price =
            Decimal::from_str(&row.total_price).map_err(|_| DbError::InvalidPrice {
                id: row.id,
                value: row.total_price.clone(),
            })?;

        Ok(OrderRecord {
            id: row.id,
            restaurant_name: row.restaurant_name,
            total_price,
            ordered_at_text: row.ordered_at_text,
            source_signature: row.source_signature,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts `orders` in one transaction, skipping any whose
/// `source_signature` already exists (including earlier entries of the same
/// batch).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction is then
/// rolled back and nothing from the batch is persisted.
pub async fn insert_orders(
    pool: &SqlitePool,
    orders: &[ScrapedOrder],
) -> Result<ImportSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = ImportSummary::default();
    let created_at = Utc::now();

    for order in orders {
        let result = sqlx::query(
            "INSERT INTO orders \
                 (restaurant_name, total_price, ordered_at_text, source_signature, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(source_signature) DO NOTHING",
        )
        .bind(&order.restaurant_name)
        .bind(order.total_price.normalize().to_string())
        .bind(&order.ordered_at_text)
        .bind(&order.source_signature)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            summary.skipped += 1;
        } else {
            summary.inserted += 1;
        }
    }

    tx.commit().await?;

    tracing::debug!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "orders batch committed"
    );
    Ok(summary)
}

/// Returns every stored order, most recently inserted first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidPrice`]
/// if a stored price cannot be parsed.
pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<OrderRecord>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, restaurant_name, total_price, ordered_at_text, source_signature, created_at \
         FROM orders \
         ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(OrderRecord::try_from).collect()
}
