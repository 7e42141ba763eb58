use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::PointsService;

#[derive(Debug, Deserialize)]
pub struct AdjustPointsRequest {
    pub delta: i64,
    pub note: String,
}

/// POST /api/admin/customers/:id/adjust-points - signed ledger adjustment
pub async fn adjust_points(
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<AdjustPointsRequest>,
) -> ApiResult<Value> {
    if payload.note.trim().is_empty() {
        return Err(ApiError::invalid_field("note", "A reason is required for adjustments"));
    }

    let pool = pool().await?;
    let balance = PointsService::new(pool)
        .admin_adjust(customer_id, payload.delta, payload.note.trim())
        .await?;
    Ok(ApiResponse::success(json!({
        "customer_id": customer_id,
        "delta": payload.delta,
        "balance": balance
    })))
}
