use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Submitted receipt. `parsed_total` is what the text parser extracted;
/// `points_awarded` is set exactly once, when the row leaves `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receipt {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub business_id: Uuid,
    pub claimed_total: Option<Decimal>,
    pub parsed_total: Option<Decimal>,
    pub raw_text: Option<String>,
    pub status: String,
    pub points_awarded: Option<i64>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
