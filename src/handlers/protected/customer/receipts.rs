use axum::extract::Query;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Receipt;
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::receipt_service::TextReceiptParser;
use crate::services::{AccountService, ReceiptService};

#[derive(Debug, Deserialize)]
pub struct SubmitReceiptRequest {
    pub business_id: Uuid,
    pub claimed_total: Option<Decimal>,
    /// Captured receipt text (from the client-side capture flow).
    pub raw_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/receipts - submit a receipt for points
pub async fn submit(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SubmitReceiptRequest>,
) -> ApiResult<Receipt> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;

    let receipt = ReceiptService::new(pool)
        .submit(
            customer.id,
            payload.business_id,
            payload.claimed_total,
            payload.raw_text.as_deref(),
            &TextReceiptParser,
        )
        .await?;
    Ok(ApiResponse::created(receipt))
}

/// GET /api/receipts - own submissions with status
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Receipt>> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let receipts = ReceiptService::new(pool)
        .receipts_for_customer(customer.id, limit, offset)
        .await?;
    Ok(ApiResponse::success(receipts))
}
