use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Separator between the three fields of a [`ScrapedOrder::source_signature`].
pub const SIGNATURE_DELIMITER: &str = "__";

/// One order row as extracted from the order-history table.
///
/// Serialized with camelCase keys and a numeric `totalPrice`, which is the
/// body shape the bulk ingest endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedOrder {
    pub restaurant_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Timestamp text as rendered by the page, e.g. `"Feb 22, 2026, 10:09:13 AM"`.
    /// Kept as text; analytics re-parse it independently.
    pub ordered_at_text: String,
    pub source_signature: String,
}

impl ScrapedOrder {
    /// Builds an order and derives its signature from the three fields.
    #[must_use]
    pub fn new(restaurant_name: String, ordered_at_text: String, total_price: Decimal) -> Self {
        let source_signature = build_signature(&restaurant_name, &ordered_at_text, total_price);
        Self {
            restaurant_name,
            total_price,
            ordered_at_text,
            source_signature,
        }
    }
}

/// Joins name, timestamp text and price with [`SIGNATURE_DELIMITER`].
///
/// The price is rendered without trailing zeros so `24.90` and `24.9` yield
/// the same key. The result is plain text, not a hash: two orders with the
/// same restaurant, timestamp text and price share a signature.
#[must_use]
pub fn build_signature(restaurant_name: &str, ordered_at_text: &str, total_price: Decimal) -> String {
    let price = total_price.normalize();
    format!("{restaurant_name}{SIGNATURE_DELIMITER}{ordered_at_text}{SIGNATURE_DELIMITER}{price}")
}

/// A persisted order, as returned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: i64,
    pub restaurant_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub ordered_at_text: String,
    pub source_signature: String,
    pub created_at: DateTime<Utc>,
}

/// Result of one bulk import: how many orders were new and how many were
/// already present (matched by signature).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub skipped: u64,
}
