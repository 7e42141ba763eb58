use axum::extract::Path;
use axum::Extension;
use uuid::Uuid;

use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::punch_service::PunchCardProgress;
use crate::services::{AccountService, PunchService};

/// POST /api/punch-cards/:id/join - enroll in a card (idempotent)
pub async fn join(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<PunchCardProgress> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let progress = PunchService::new(pool).join(card_id, customer.id).await?;
    Ok(ApiResponse::success(progress))
}

/// GET /api/punch-cards - enrolled cards with progress
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<PunchCardProgress>> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let cards = PunchService::new(pool).cards_for_customer(customer.id).await?;
    Ok(ApiResponse::success(cards))
}
