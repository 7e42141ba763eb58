use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PunchCard {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub punches_required: i32,
    pub reward_description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row. Invariant: `punches_count` never exceeds the card's
/// `punches_required`; the increment is a conditional UPDATE, never a
/// read-modify-write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PunchCardCustomer {
    pub punch_card_id: Uuid,
    pub customer_id: Uuid,
    pub punches_count: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One recorded visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PunchCardPunch {
    pub id: Uuid,
    pub punch_card_id: Uuid,
    pub customer_id: Uuid,
    pub recorded_by: Uuid,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
