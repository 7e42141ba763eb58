use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::account_service::Profile;
use crate::services::AccountService;

/// GET /api/auth/whoami - current account plus its role profile
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<Profile> {
    let pool = super::super::pool().await?;
    let profile = AccountService::new(pool).profile(user.account_id).await?;
    Ok(ApiResponse::success(profile))
}
