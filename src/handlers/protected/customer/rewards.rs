use axum::extract::{Path, Query};
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Redemption, Reward};
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::catalog_service::OfferCatalog;
use crate::services::{AccountService, CatalogService, RedemptionService};

#[derive(Debug, Deserialize)]
pub struct BusinessScopedQuery {
    pub business_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/rewards?business_id= - active rewards at a business
pub async fn rewards(Query(query): Query<BusinessScopedQuery>) -> ApiResult<Vec<Reward>> {
    let pool = pool().await?;
    let rewards = CatalogService::new(pool).active_rewards(query.business_id).await?;
    Ok(ApiResponse::success(rewards))
}

/// POST /api/rewards/:id/redeem - spend points, receive a single-use code
pub async fn redeem(
    Extension(user): Extension<AuthUser>,
    Path(reward_id): Path<Uuid>,
) -> ApiResult<Redemption> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let redemption = RedemptionService::new(pool).redeem_reward(customer.id, reward_id).await?;
    Ok(ApiResponse::created(redemption))
}

/// GET /api/redemptions - own redemptions with codes
pub async fn redemptions(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Redemption>> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let rows = RedemptionService::new(pool)
        .redemptions_for_customer(customer.id, limit, offset)
        .await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/offers?business_id= - live offers at a business
pub async fn offers(Query(query): Query<BusinessScopedQuery>) -> ApiResult<OfferCatalog> {
    let pool = pool().await?;
    let catalog = CatalogService::new(pool).offers_at_business(query.business_id).await?;
    Ok(ApiResponse::success(catalog))
}

/// POST /api/offers/discount/:id/claim
pub async fn claim_discount(
    Extension(user): Extension<AuthUser>,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<Redemption> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let redemption = RedemptionService::new(pool).claim_discount(customer.id, offer_id).await?;
    Ok(ApiResponse::created(redemption))
}

/// POST /api/offers/exclusive/:id/claim
pub async fn claim_exclusive(
    Extension(user): Extension<AuthUser>,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<Redemption> {
    let pool = pool().await?;
    let customer = AccountService::new(pool.clone()).customer_for_account(user.account_id).await?;
    let redemption = RedemptionService::new(pool).claim_exclusive(customer.id, offer_id).await?;
    Ok(ApiResponse::created(redemption))
}
