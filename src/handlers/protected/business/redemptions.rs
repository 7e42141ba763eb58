use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::models::Redemption;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::RedemptionService;

use super::own_business_id;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// POST /api/business/redemptions/verify - consume a presented code.
/// First caller wins; replays conflict.
pub async fn verify(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<VerifyRequest>,
) -> ApiResult<Redemption> {
    let pool = pool().await?;
    let business_id = own_business_id(&pool, &user).await?;
    let redemption = RedemptionService::new(pool).verify_code(business_id, &payload.code).await?;
    Ok(ApiResponse::success(redemption))
}
