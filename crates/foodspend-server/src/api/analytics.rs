use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Local;

use foodspend_core::{build_buckets, Period, SpendBucket};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// `GET /analytics/{period}`: spend buckets from the earliest order through
/// today (or the latest order, if that is later).
pub(super) async fn spending_by_period(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(period): Path<String>,
) -> Result<Json<ApiResponse<Vec<SpendBucket>>>, ApiError> {
    let period: Period = period
        .parse()
        .map_err(|message: String| ApiError::bad_request(req_id.0.clone(), message))?;

    let records = foodspend_db::list_orders(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let today = Local::now().date_naive();
    let data = build_buckets(&records, period, today);
    tracing::debug!(%period, records = records.len(), buckets = data.len(), "built spend buckets");

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
