use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Receipt;
use crate::error::ApiError;
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ReceiptService;
use crate::types::ReceiptStatus;

use super::own_business_id;

#[derive(Debug, Deserialize)]
pub struct ReceiptListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReviewRequest {
    pub note: Option<String>,
}

/// GET /api/business/receipts?status= - submissions awaiting review
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ReceiptListQuery>,
) -> ApiResult<Vec<Receipt>> {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            ReceiptStatus::parse(s)
                .ok_or_else(|| ApiError::invalid_field("status", format!("Unknown status '{}'", s)))?,
        ),
    };

    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let receipts = ReceiptService::new(pool)
        .receipts_for_business(business_id, status, limit, offset)
        .await?;
    Ok(ApiResponse::success(receipts))
}

/// POST /api/business/receipts/:id/approve - award points exactly once
pub async fn approve(
    Extension(user): Extension<AuthUser>,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<Receipt> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let receipt = ReceiptService::new(pool)
        .approve(business_id, receipt_id, payload.note.as_deref())
        .await?;
    Ok(ApiResponse::success(receipt))
}

/// POST /api/business/receipts/:id/reject
pub async fn reject(
    Extension(user): Extension<AuthUser>,
    Path(receipt_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<Receipt> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let receipt = ReceiptService::new(pool)
        .reject(business_id, receipt_id, payload.note.as_deref())
        .await?;
    Ok(ApiResponse::success(receipt))
}
