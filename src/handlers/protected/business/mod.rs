pub mod analytics;
pub mod lists;
pub mod offers;
pub mod punch_cards;
pub mod receipts;
pub mod redemptions;
pub mod rewards;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Business;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::BusinessService;

/// Resolve the approved business behind an authenticated business
/// account. Pending and suspended businesses get a 403 here, which is
/// what locks a suspended business out of the whole surface.
pub(crate) async fn own_business(pool: &PgPool, user: &AuthUser) -> Result<Business, ApiError> {
    Ok(BusinessService::new(pool.clone()).approved_for_account(user.account_id).await?)
}

/// Shorthand for handlers that only need the business id.
pub(crate) async fn own_business_id(pool: &PgPool, user: &AuthUser) -> Result<Uuid, ApiError> {
    Ok(own_business(pool, user).await?.id)
}
