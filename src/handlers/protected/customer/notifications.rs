use axum::extract::{Path, Query};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Notification;
use crate::handlers::{page_params, pool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub unread: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/notifications - notification feed for any account role
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    let (limit, offset) = page_params(query.limit, query.offset);
    let pool = pool().await?;
    let rows = NotificationService::new(pool)
        .list(user.account_id, query.unread.unwrap_or(false), limit, offset)
        .await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Notification> {
    let pool = pool().await?;
    let notification = NotificationService::new(pool).mark_read(user.account_id, id).await?;
    Ok(ApiResponse::success(notification))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = pool().await?;
    let marked = NotificationService::new(pool).mark_all_read(user.account_id).await?;
    Ok(ApiResponse::success(json!({ "marked_read": marked })))
}
