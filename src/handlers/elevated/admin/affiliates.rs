use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::AffiliateLink;
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AffiliateService;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub influencer_name: String,
    pub target_url: String,
}

/// GET /api/admin/affiliates - 403 while the program is disabled
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<Vec<AffiliateLink>> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let links = AffiliateService::new(pool).admin_list(limit, offset).await?;
    Ok(ApiResponse::success(links))
}

/// POST /api/admin/affiliates
pub async fn create(Json(payload): Json<CreateLinkRequest>) -> ApiResult<AffiliateLink> {
    let pool = pool().await?;
    let link = AffiliateService::new(pool)
        .admin_create(&payload.influencer_name, &payload.target_url)
        .await?;
    Ok(ApiResponse::created(link))
}

/// POST /api/admin/affiliates/:id/deactivate
pub async fn deactivate(Path(link_id): Path<Uuid>) -> ApiResult<AffiliateLink> {
    let pool = pool().await?;
    let link = AffiliateService::new(pool).admin_deactivate(link_id).await?;
    Ok(ApiResponse::success(link))
}
