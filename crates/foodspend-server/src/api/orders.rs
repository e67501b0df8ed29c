use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use rust_decimal::Decimal;
use serde_json::Value;

use foodspend_core::{ImportSummary, OrderRecord, ScrapedOrder};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// String fields every bulk element must carry.
const STRING_FIELDS: [&str; 3] = ["restaurantName", "orderedAtText", "sourceSignature"];

/// Upper bound for a single order total; larger values are rejected as bogus.
const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// `POST /orders/bulk`: inserts a batch, skipping known signatures.
///
/// The body is parsed by hand so that every malformed payload, including
/// invalid JSON, produces the `bad_request` envelope.
pub(super) async fn bulk_insert_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportSummary>), ApiError> {
    let rid = &req_id.0;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(rid, format!("request body is not valid JSON: {e}")))?;
    let orders =
        parse_bulk_orders(&payload).map_err(|message| ApiError::bad_request(rid, message))?;

    let summary = foodspend_db::insert_orders(&state.pool, &orders)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        received = orders.len(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "bulk import processed"
    );

    Ok((StatusCode::CREATED, Json(summary)))
}

/// `GET /orders`: every stored order, newest insert first.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<OrderRecord>>>, ApiError> {
    let data = foodspend_db::list_orders(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Checks the `{"orders": [...]}` shape and converts each element.
///
/// Returns a message naming the first offending element and field.
fn parse_bulk_orders(payload: &Value) -> Result<Vec<ScrapedOrder>, String> {
    let Some(items) = payload.get("orders").and_then(Value::as_array) else {
        return Err("orders must be an array".to_string());
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_order(index, item))
        .collect()
}

fn parse_order(index: usize, item: &Value) -> Result<ScrapedOrder, String> {
    let Some(fields) = item.as_object() else {
        return Err(format!("orders[{index}] must be an object"));
    };

    for name in STRING_FIELDS {
        if !fields.get(name).is_some_and(Value::is_string) {
            return Err(format!("orders[{index}].{name} must be a string"));
        }
    }
    if !fields.get("totalPrice").is_some_and(Value::is_number) {
        return Err(format!("orders[{index}].totalPrice must be a number"));
    }

    let order: ScrapedOrder = serde_json::from_value(item.clone())
        .map_err(|e| format!("orders[{index}] is invalid: {e}"))?;
    if order.total_price.is_sign_negative() || order.total_price > MAX_ORDER_TOTAL {
        return Err(format!(
            "orders[{index}].totalPrice must be between 0 and {MAX_ORDER_TOTAL}"
        ));
    }
    Ok(order)
}
