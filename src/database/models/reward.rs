use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Point-priced reward. `inventory` NULL means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reward {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub inventory: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A claim on a reward/offer/punch-card prize, tracked by a single-use
/// code. `source` says which of the optional foreign keys is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Redemption {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub business_id: Uuid,
    pub reward_id: Option<Uuid>,
    pub discount_offer_id: Option<Uuid>,
    pub exclusive_offer_id: Option<Uuid>,
    pub source: String,
    pub code: String,
    pub status: String,
    pub points_spent: i64,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}
