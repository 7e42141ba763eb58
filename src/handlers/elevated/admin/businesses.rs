use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Business;
use crate::error::ApiError;
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::BusinessService;
use crate::types::BusinessStatus;

#[derive(Debug, Deserialize)]
pub struct RegistryQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SuspendRequest {
    pub reason: String,
}

/// GET /api/admin/businesses?status= - registry with status filter
pub async fn list(Query(query): Query<RegistryQuery>) -> ApiResult<Vec<Business>> {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            BusinessStatus::parse(s)
                .ok_or_else(|| ApiError::invalid_field("status", format!("Unknown status '{}'", s)))?,
        ),
    };

    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let rows = BusinessService::new(pool).admin_list(status, limit, offset).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/admin/businesses/:id/approve
pub async fn approve(Path(business_id): Path<Uuid>) -> ApiResult<Business> {
    let pool = pool().await?;
    let business = BusinessService::new(pool).approve(business_id).await?;
    Ok(ApiResponse::success(business))
}

/// POST /api/admin/businesses/:id/suspend - reason required
pub async fn suspend(
    Path(business_id): Path<Uuid>,
    Json(payload): Json<SuspendRequest>,
) -> ApiResult<Business> {
    let pool = pool().await?;
    let business = BusinessService::new(pool).suspend(business_id, &payload.reason).await?;
    Ok(ApiResponse::success(business))
}

/// POST /api/admin/businesses/:id/restore
pub async fn restore(Path(business_id): Path<Uuid>) -> ApiResult<Business> {
    let pool = pool().await?;
    let business = BusinessService::new(pool).restore(business_id).await?;
    Ok(ApiResponse::success(business))
}
