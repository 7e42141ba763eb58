use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only points ledger entry. `reference_id` points at the row that
/// caused the entry (receipt, redemption, scan) when there is one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointEntry {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub delta: i64,
    pub reason: String,
    pub business_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
