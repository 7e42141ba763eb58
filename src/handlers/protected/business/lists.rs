use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::CuratedList;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ListService;

use super::own_business;

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub business_id: Uuid,
    pub position: Option<i32>,
}

/// POST /api/business/lists
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ListRequest>,
) -> ApiResult<CuratedList> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    let list = ListService::new(pool)
        .create(user.account_id, &payload.title, payload.description.as_deref())
        .await?;
    Ok(ApiResponse::created(list))
}

/// GET /api/business/lists
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<CuratedList>> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    let lists = ListService::new(pool).lists_for_owner(user.account_id).await?;
    Ok(ApiResponse::success(lists))
}

/// PUT /api/business/lists/:id
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<ListRequest>,
) -> ApiResult<CuratedList> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    let list = ListService::new(pool)
        .update(user.account_id, list_id, &payload.title, payload.description.as_deref())
        .await?;
    Ok(ApiResponse::success(list))
}

/// DELETE /api/business/lists/:id
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    ListService::new(pool).delete(user.account_id, list_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// POST /api/business/lists/:id/entries
pub async fn add_entry(
    Extension(user): Extension<AuthUser>,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<AddEntryRequest>,
) -> ApiResult<()> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    ListService::new(pool)
        .add_entry(user.account_id, list_id, payload.business_id, payload.position.unwrap_or(0))
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/business/lists/:id/entries/:business_id
pub async fn remove_entry(
    Extension(user): Extension<AuthUser>,
    Path((list_id, business_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let pool = pool().await?;
    own_business(&pool, &user).await?;
    ListService::new(pool).remove_entry(user.account_id, list_id, business_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
