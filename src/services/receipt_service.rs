use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::models::Receipt;
use crate::types::{PointReason, ReceiptStatus};

use super::notification_service::NotificationService;
use super::points_service::PointsService;
use super::{ServiceError, ServiceResult};

/// Seam for receipt total extraction. The shipped implementation works on
/// captured text; a vendor OCR backend would slot in behind the same trait.
#[async_trait]
pub trait ReceiptParser: Send + Sync {
    async fn parse_total(&self, raw_text: &str) -> Option<Decimal>;
}

/// Extracts the total from receipt text with line-oriented regexes.
pub struct TextReceiptParser;

static TOTAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(grand\s+total|total|amount\s+due|balance\s+due)\b").expect("total line regex"));
static SUBTOTAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsub\s*-?\s*total\b").expect("subtotal line regex"));
static MONEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,]*)\.([0-9]{2})\b").expect("money regex"));

impl TextReceiptParser {
    fn extract(raw_text: &str) -> Option<Decimal> {
        // Prefer the last line that names a total; subtotal lines never
        // qualify. Fall back to the largest amount anywhere on the slip.
        let mut keyword_hit = None;
        for line in raw_text.lines() {
            if SUBTOTAL_LINE.is_match(line) || !TOTAL_LINE.is_match(line) {
                continue;
            }
            if let Some(amount) = Self::last_amount(line) {
                keyword_hit = Some(amount);
            }
        }

        keyword_hit.or_else(|| {
            raw_text
                .lines()
                .filter_map(Self::last_amount)
                .max()
        })
    }

    fn last_amount(line: &str) -> Option<Decimal> {
        MONEY
            .captures_iter(line)
            .filter_map(|c| {
                let whole = c.get(1)?.as_str().replace(',', "");
                let cents = c.get(2)?.as_str();
                format!("{}.{}", whole, cents).parse::<Decimal>().ok()
            })
            .last()
    }

    /// Whether a parsed total corroborates the customer's claim:
    /// within 5% or one currency unit, whichever is looser.
    pub fn matches_claim(parsed: Decimal, claimed: Decimal) -> bool {
        let diff = (parsed - claimed).abs();
        let tolerance = std::cmp::max(Decimal::ONE, claimed.abs() * Decimal::new(5, 2));
        diff <= tolerance
    }
}

#[async_trait]
impl ReceiptParser for TextReceiptParser {
    async fn parse_total(&self, raw_text: &str) -> Option<Decimal> {
        Self::extract(raw_text)
    }
}

pub struct ReceiptService {
    pool: PgPool,
}

impl ReceiptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit a receipt. A parse that corroborates the claim auto-approves
    /// and awards points immediately; anything murky parks as pending for
    /// the business to review.
    pub async fn submit(
        &self,
        customer_id: Uuid,
        business_id: Uuid,
        claimed_total: Option<Decimal>,
        raw_text: Option<&str>,
        parser: &dyn ReceiptParser,
    ) -> ServiceResult<Receipt> {
        if claimed_total.is_none() && raw_text.map_or(true, |t| t.trim().is_empty()) {
            return Err(ServiceError::invalid(
                "Provide a claimed total, captured receipt text, or both",
            ));
        }
        if let Some(total) = claimed_total {
            if total <= Decimal::ZERO {
                return Err(ServiceError::invalid("claimed_total must be positive"));
            }
        }

        let business_ok: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM businesses WHERE id = $1 AND status = 'approved'")
                .bind(business_id)
                .fetch_optional(&self.pool)
                .await?;
        if business_ok.is_none() {
            return Err(ServiceError::not_found("Business not found"));
        }

        let parsed_total = match raw_text {
            Some(text) => parser.parse_total(text).await,
            None => None,
        };

        let auto_approved_total = match (parsed_total, claimed_total) {
            (Some(parsed), Some(claimed)) if TextReceiptParser::matches_claim(parsed, claimed) => {
                Some(parsed)
            }
            (Some(parsed), None) => Some(parsed),
            _ => None,
        };

        let mut tx = self.pool.begin().await?;

        let receipt: Receipt = sqlx::query_as(
            r#"
            INSERT INTO receipts (customer_id, business_id, claimed_total, parsed_total, raw_text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(business_id)
        .bind(claimed_total)
        .bind(parsed_total)
        .bind(raw_text)
        .fetch_one(&mut *tx)
        .await?;

        let receipt = if let Some(total) = auto_approved_total {
            let points = points_for_total(total);
            let approved: Receipt = sqlx::query_as(
                r#"
                UPDATE receipts
                SET status = 'approved', points_awarded = $2, reviewed_at = now()
                WHERE id = $1 AND status = 'pending'
                RETURNING *
                "#,
            )
            .bind(receipt.id)
            .bind(points)
            .fetch_one(&mut *tx)
            .await?;

            if points > 0 {
                PointsService::credit_in(
                    &mut *tx,
                    customer_id,
                    points,
                    PointReason::Receipt,
                    Some(business_id),
                    Some(receipt.id),
                    None,
                )
                .await?;
            }
            approved
        } else {
            receipt
        };

        tx.commit().await?;
        Ok(receipt)
    }

    pub async fn receipts_for_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Receipt>> {
        let rows: Vec<Receipt> = sqlx::query_as(
            "SELECT * FROM receipts WHERE customer_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn receipts_for_business(
        &self,
        business_id: Uuid,
        status: Option<ReceiptStatus>,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Receipt>> {
        let rows: Vec<Receipt> = match status {
            Some(s) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM receipts
                    WHERE business_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(business_id)
                .bind(s.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM receipts
                    WHERE business_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(business_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Manual approval. The `pending -> approved` transition is guarded,
    /// so points are awarded exactly once no matter how many reviewers
    /// click.
    pub async fn approve(
        &self,
        business_id: Uuid,
        receipt_id: Uuid,
        note: Option<&str>,
    ) -> ServiceResult<Receipt> {
        let mut tx = self.pool.begin().await?;

        let receipt: Receipt = sqlx::query_as(
            r#"
            UPDATE receipts
            SET status = 'approved', review_note = $3, reviewed_at = now()
            WHERE id = $1 AND business_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(receipt_id)
        .bind(business_id)
        .bind(note)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::conflict("Receipt is not pending review"))?;

        let total = receipt
            .parsed_total
            .or(receipt.claimed_total)
            .ok_or_else(|| ServiceError::conflict("Receipt has no total to award points for"))?;
        let points = points_for_total(total);

        let receipt: Receipt =
            sqlx::query_as("UPDATE receipts SET points_awarded = $2 WHERE id = $1 RETURNING *")
                .bind(receipt_id)
                .bind(points)
                .fetch_one(&mut *tx)
                .await?;

        if points > 0 {
            PointsService::credit_in(
                &mut *tx,
                receipt.customer_id,
                points,
                PointReason::Receipt,
                Some(business_id),
                Some(receipt_id),
                None,
            )
            .await?;
        }

        let account: Option<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM customers WHERE id = $1")
                .bind(receipt.customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some((account_id,)) = account {
            NotificationService::notify_in(
                &mut *tx,
                account_id,
                "receipt_approved",
                "Receipt approved",
                Some(&format!("{} points added to your balance.", points)),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(receipt)
    }

    pub async fn reject(
        &self,
        business_id: Uuid,
        receipt_id: Uuid,
        note: Option<&str>,
    ) -> ServiceResult<Receipt> {
        let mut tx = self.pool.begin().await?;

        let receipt: Receipt = sqlx::query_as(
            r#"
            UPDATE receipts
            SET status = 'rejected', review_note = $3, reviewed_at = now()
            WHERE id = $1 AND business_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(receipt_id)
        .bind(business_id)
        .bind(note)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::conflict("Receipt is not pending review"))?;

        let account: Option<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM customers WHERE id = $1")
                .bind(receipt.customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some((account_id,)) = account {
            NotificationService::notify_in(
                &mut *tx,
                account_id,
                "receipt_rejected",
                "Receipt rejected",
                note,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(receipt)
    }
}

/// Whole currency units earn points; cents are dropped.
fn points_for_total(total: Decimal) -> i64 {
    let rate = config::config().economy.points_per_currency_unit;
    total.trunc().to_i64().unwrap_or(0).max(0) * rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labelled_total() {
        let text = "NAGA CAFE\nLatte 4.50\nCroissant 3.25\nSubtotal 7.75\nTax 0.62\nTOTAL 8.37\n";
        assert_eq!(TextReceiptParser::extract(text), Some(Decimal::new(837, 2)));
    }

    #[test]
    fn prefers_grand_total_over_subtotal() {
        let text = "Sub-Total 19.99\nGrand Total 21.59\n";
        assert_eq!(TextReceiptParser::extract(text), Some(Decimal::new(2159, 2)));
    }

    #[test]
    fn falls_back_to_largest_amount() {
        let text = "Item A 3.00\nItem B 12.40\nItem C 1.10\n";
        assert_eq!(TextReceiptParser::extract(text), Some(Decimal::new(1240, 2)));
    }

    #[test]
    fn handles_thousands_separators() {
        let text = "TOTAL 1,234.56\n";
        assert_eq!(TextReceiptParser::extract(text), Some(Decimal::new(123456, 2)));
    }

    #[test]
    fn no_amounts_no_total() {
        assert_eq!(TextReceiptParser::extract("thanks for visiting"), None);
    }

    #[test]
    fn claim_tolerance() {
        let parsed = Decimal::new(1000, 2); // 10.00
        assert!(TextReceiptParser::matches_claim(parsed, Decimal::new(1000, 2)));
        assert!(TextReceiptParser::matches_claim(parsed, Decimal::new(1049, 2)));
        assert!(TextReceiptParser::matches_claim(parsed, Decimal::new(1100, 2))); // within 1.00
        assert!(!TextReceiptParser::matches_claim(parsed, Decimal::new(1200, 2)));
    }
}
