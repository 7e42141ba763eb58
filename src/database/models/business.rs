use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Business profile. Created `pending` at registration; admins move it
/// through `approved`/`suspended`. Only approved businesses appear in the
/// public directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub suspended_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
