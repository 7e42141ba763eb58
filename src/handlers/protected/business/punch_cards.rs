use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::PunchCard;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::punch_service::{BulkPunchResult, EnrolledCustomer, PunchOutcome};
use crate::services::PunchService;

use super::own_business_id;

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    pub description: Option<String>,
    pub punches_required: i32,
    pub reward_description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub name: String,
    pub description: Option<String>,
    pub punches_required: i32,
    pub reward_description: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PunchRequest {
    pub customer_id: Uuid,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkPunchRequest {
    pub customer_ids: Vec<Uuid>,
}

/// POST /api/business/punch-cards
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCardRequest>,
) -> ApiResult<PunchCard> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let card = PunchService::new(pool)
        .create_card(
            business_id,
            &payload.name,
            payload.description.as_deref(),
            payload.punches_required,
            &payload.reward_description,
        )
        .await?;
    Ok(ApiResponse::created(card))
}

/// GET /api/business/punch-cards
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<PunchCard>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let cards = PunchService::new(pool).cards_for_business(business_id).await?;
    Ok(ApiResponse::success(cards))
}

/// PUT /api/business/punch-cards/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> ApiResult<PunchCard> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let card = PunchService::new(pool)
        .update_card(
            business_id,
            card_id,
            &payload.name,
            payload.description.as_deref(),
            payload.punches_required,
            &payload.reward_description,
            payload.is_active,
        )
        .await?;
    Ok(ApiResponse::success(card))
}

/// DELETE /api/business/punch-cards/:id - soft-deactivate
pub async fn deactivate(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<PunchCard> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let card = PunchService::new(pool).deactivate_card(business_id, card_id).await?;
    Ok(ApiResponse::success(card))
}

/// GET /api/business/punch-cards/:id/customers
pub async fn customers(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
) -> ApiResult<Vec<EnrolledCustomer>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let rows = PunchService::new(pool).enrolled_customers(business_id, card_id).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/business/punch-cards/:id/punch - record one visit
pub async fn punch(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<PunchRequest>,
) -> ApiResult<PunchOutcome> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let outcome = PunchService::new(pool)
        .punch(
            business_id,
            card_id,
            payload.customer_id,
            user.account_id,
            payload.note.as_deref(),
        )
        .await?;
    Ok(ApiResponse::created(outcome))
}

/// POST /api/business/punch-cards/:id/punch/bulk - one punch for many
/// customers, partial success reported per customer
pub async fn punch_bulk(
    Extension(user): Extension<AuthUser>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<BulkPunchRequest>,
) -> ApiResult<Vec<BulkPunchResult>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let results = PunchService::new(pool)
        .bulk_punch(business_id, card_id, &payload.customer_ids, user.account_id)
        .await?;
    Ok(ApiResponse::success(results))
}
