use axum::extract::Path;
use uuid::Uuid;

use crate::database::models::CuratedList;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ListService;

/// POST /api/admin/lists/:id/feature
pub async fn feature(Path(list_id): Path<Uuid>) -> ApiResult<CuratedList> {
    let pool = pool().await?;
    let list = ListService::new(pool).set_featured(list_id, true).await?;
    Ok(ApiResponse::success(list))
}

/// POST /api/admin/lists/:id/unfeature
pub async fn unfeature(Path(list_id): Path<Uuid>) -> ApiResult<CuratedList> {
    let pool = pool().await?;
    let list = ListService::new(pool).set_featured(list_id, false).await?;
    Ok(ApiResponse::success(list))
}
