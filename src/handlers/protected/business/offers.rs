use axum::extract::Path;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Deal, DiscountOffer, ExclusiveOffer};
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CatalogService;

use super::own_business_id;

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub title: String,
    pub percent_off: i32,
    pub points_cost: i64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExclusiveRequest {
    pub title: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub quantity_total: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub title: String,
    pub body: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// POST /api/business/offers/discount
pub async fn create_discount(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateDiscountRequest>,
) -> ApiResult<DiscountOffer> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offer = CatalogService::new(pool)
        .create_discount(
            business_id,
            &payload.title,
            payload.percent_off,
            payload.points_cost,
            payload.starts_at,
            payload.ends_at,
        )
        .await?;
    Ok(ApiResponse::created(offer))
}

/// GET /api/business/offers/discount
pub async fn list_discounts(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<DiscountOffer>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offers = CatalogService::new(pool).discounts_for_business(business_id).await?;
    Ok(ApiResponse::success(offers))
}

/// DELETE /api/business/offers/discount/:id - soft-deactivate
pub async fn deactivate_discount(
    Extension(user): Extension<AuthUser>,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<DiscountOffer> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offer = CatalogService::new(pool).deactivate_discount(business_id, offer_id).await?;
    Ok(ApiResponse::success(offer))
}

/// POST /api/business/offers/exclusive
pub async fn create_exclusive(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateExclusiveRequest>,
) -> ApiResult<ExclusiveOffer> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offer = CatalogService::new(pool)
        .create_exclusive(
            business_id,
            &payload.title,
            payload.description.as_deref(),
            payload.points_cost,
            payload.quantity_total,
        )
        .await?;
    Ok(ApiResponse::created(offer))
}

/// GET /api/business/offers/exclusive
pub async fn list_exclusives(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<ExclusiveOffer>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offers = CatalogService::new(pool).exclusives_for_business(business_id).await?;
    Ok(ApiResponse::success(offers))
}

/// DELETE /api/business/offers/exclusive/:id - soft-deactivate
pub async fn deactivate_exclusive(
    Extension(user): Extension<AuthUser>,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<ExclusiveOffer> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let offer = CatalogService::new(pool).deactivate_exclusive(business_id, offer_id).await?;
    Ok(ApiResponse::success(offer))
}

/// POST /api/business/deals
pub async fn create_deal(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateDealRequest>,
) -> ApiResult<Deal> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let deal = CatalogService::new(pool)
        .create_deal(
            business_id,
            &payload.title,
            payload.body.as_deref(),
            payload.starts_at,
            payload.ends_at,
        )
        .await?;
    Ok(ApiResponse::created(deal))
}

/// GET /api/business/deals
pub async fn list_deals(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Deal>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let deals = CatalogService::new(pool).deals_for_business(business_id).await?;
    Ok(ApiResponse::success(deals))
}

/// DELETE /api/business/deals/:id
pub async fn delete_deal(
    Extension(user): Extension<AuthUser>,
    Path(deal_id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    CatalogService::new(pool).delete_deal(business_id, deal_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
