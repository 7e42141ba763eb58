use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Percent-off discount claimable for points.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiscountOffer {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub percent_off: i32,
    pub points_cost: i64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Limited-quantity offer. Invariant: `quantity_claimed <= quantity_total`,
/// held by claiming through a conditional UPDATE.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExclusiveOffer {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub quantity_total: i32,
    pub quantity_claimed: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plain time-windowed announcement; no points involved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
