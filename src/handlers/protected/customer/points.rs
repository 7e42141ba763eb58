use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::points_service::{PointsSummary, ScanResult};
use crate::services::{AccountService, PointsService};

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub business_id: Uuid,
}

/// GET /api/customer/points - balance plus recent ledger
pub async fn points(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<PointsSummary> {
    let (limit, _) = page_params(query.limit, None);
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let summary = PointsService::new(pool).summary(customer.id, limit).await?;
    Ok(ApiResponse::success(summary))
}

/// POST /api/scan - QR check-in at a business, once per day
pub async fn scan(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ScanRequest>,
) -> ApiResult<ScanResult> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let result = PointsService::new(pool).scan_checkin(customer.id, payload.business_id).await?;
    Ok(ApiResponse::success(result))
}
