use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ordered list of businesses. Admins flip `is_featured` to surface a list
/// on the public directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CuratedList {
    pub id: Uuid,
    pub owner_account_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CuratedListEntry {
    pub list_id: Uuid,
    pub business_id: Uuid,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
