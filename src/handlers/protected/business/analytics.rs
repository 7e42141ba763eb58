use axum::Extension;

use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::business_service::BusinessAnalytics;
use crate::services::BusinessService;

use super::own_business_id;

/// GET /api/business/analytics - dashboard counters
pub async fn dashboard(Extension(user): Extension<AuthUser>) -> ApiResult<BusinessAnalytics> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let analytics = BusinessService::new(pool).analytics(business_id).await?;
    Ok(ApiResponse::success(analytics))
}
