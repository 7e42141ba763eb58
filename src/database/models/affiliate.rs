use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Influencer referral link. The whole affiliate surface sits behind
/// `economy.affiliates_enabled`, which ships off.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AffiliateLink {
    pub id: Uuid,
    pub influencer_name: String,
    pub code: String,
    pub target_url: String,
    pub is_active: bool,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

/// Signup attributed to a link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AffiliateAttribution {
    pub id: Uuid,
    pub link_id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
}
