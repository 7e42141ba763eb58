use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Reward;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CatalogService;

use super::own_business_id;

#[derive(Debug, Deserialize)]
pub struct CreateRewardRequest {
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub inventory: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRewardRequest {
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub inventory: Option<i32>,
    pub is_active: bool,
}

/// POST /api/business/rewards
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateRewardRequest>,
) -> ApiResult<Reward> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let reward = CatalogService::new(pool)
        .create_reward(
            business_id,
            &payload.name,
            payload.description.as_deref(),
            payload.points_cost,
            payload.inventory,
        )
        .await?;
    Ok(ApiResponse::created(reward))
}

/// GET /api/business/rewards
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Reward>> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let rewards = CatalogService::new(pool).rewards_for_business(business_id).await?;
    Ok(ApiResponse::success(rewards))
}

/// PUT /api/business/rewards/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(reward_id): Path<Uuid>,
    Json(payload): Json<UpdateRewardRequest>,
) -> ApiResult<Reward> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let reward = CatalogService::new(pool)
        .update_reward(
            business_id,
            reward_id,
            &payload.name,
            payload.description.as_deref(),
            payload.points_cost,
            payload.inventory,
            payload.is_active,
        )
        .await?;
    Ok(ApiResponse::success(reward))
}

/// DELETE /api/business/rewards/:id - soft-deactivate
pub async fn deactivate(
    Extension(user): Extension<AuthUser>,
    Path(reward_id): Path<Uuid>,
) -> ApiResult<Reward> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let reward = CatalogService::new(pool).deactivate_reward(business_id, reward_id).await?;
    Ok(ApiResponse::success(reward))
}
