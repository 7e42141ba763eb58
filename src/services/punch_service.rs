use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{Customer, PunchCard};
use crate::types::RedemptionSource;

use super::notification_service::NotificationService;
use super::redemption_service::RedemptionService;
use super::{ServiceError, ServiceResult};

#[derive(Debug, Serialize, FromRow)]
pub struct PunchCardProgress {
    pub punch_card_id: Uuid,
    pub business_id: Uuid,
    pub business_name: String,
    pub name: String,
    pub reward_description: String,
    pub punches_required: i32,
    pub punches_count: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, FromRow)]
pub struct EnrolledCustomer {
    pub customer_id: Uuid,
    pub display_name: String,
    pub punches_count: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

/// Result of one recorded punch.
#[derive(Debug, Serialize)]
pub struct PunchOutcome {
    pub punch_card_id: Uuid,
    pub customer_id: Uuid,
    pub punches_count: i32,
    pub punches_required: i32,
    pub completed: bool,
    /// Set when this punch completed the card: the issued reward code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_code: Option<String>,
}

/// Per-customer result of a bulk punch.
#[derive(Debug, Serialize)]
pub struct BulkPunchResult {
    pub customer_id: Uuid,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PunchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct PunchService {
    pool: PgPool,
}

impl PunchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_card(
        &self,
        business_id: Uuid,
        name: &str,
        description: Option<&str>,
        punches_required: i32,
        reward_description: &str,
    ) -> ServiceResult<PunchCard> {
        validate_card_fields(name, punches_required, reward_description)?;

        let card: PunchCard = sqlx::query_as(
            r#"
            INSERT INTO punch_cards (business_id, name, description, punches_required, reward_description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(name.trim())
        .bind(description)
        .bind(punches_required)
        .bind(reward_description.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    pub async fn cards_for_business(&self, business_id: Uuid) -> ServiceResult<Vec<PunchCard>> {
        let rows: Vec<PunchCard> =
            sqlx::query_as("SELECT * FROM punch_cards WHERE business_id = $1 ORDER BY created_at")
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn update_card(
        &self,
        business_id: Uuid,
        card_id: Uuid,
        name: &str,
        description: Option<&str>,
        punches_required: i32,
        reward_description: &str,
        is_active: bool,
    ) -> ServiceResult<PunchCard> {
        validate_card_fields(name, punches_required, reward_description)?;

        sqlx::query_as(
            r#"
            UPDATE punch_cards
            SET name = $3, description = $4, punches_required = $5,
                reward_description = $6, is_active = $7, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(business_id)
        .bind(name.trim())
        .bind(description)
        .bind(punches_required)
        .bind(reward_description.trim())
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Punch card not found"))
    }

    /// Soft-deactivate. Memberships and earned rewards survive.
    pub async fn deactivate_card(&self, business_id: Uuid, card_id: Uuid) -> ServiceResult<PunchCard> {
        sqlx::query_as(
            r#"
            UPDATE punch_cards
            SET is_active = FALSE, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Punch card not found"))
    }

    /// Customer enrollment. Idempotent: re-joining returns the existing
    /// membership untouched.
    pub async fn join(&self, card_id: Uuid, customer_id: Uuid) -> ServiceResult<PunchCardProgress> {
        let card: PunchCard = sqlx::query_as("SELECT * FROM punch_cards WHERE id = $1")
            .bind(card_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Punch card not found"))?;

        if !card.is_active {
            return Err(ServiceError::conflict("Punch card is no longer active"));
        }

        sqlx::query(
            r#"
            INSERT INTO punch_card_customers (punch_card_id, customer_id)
            VALUES ($1, $2)
            ON CONFLICT (punch_card_id, customer_id) DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        self.progress(card_id, customer_id).await
    }

    /// Enrolled cards with progress, newest first.
    pub async fn cards_for_customer(&self, customer_id: Uuid) -> ServiceResult<Vec<PunchCardProgress>> {
        let rows: Vec<PunchCardProgress> = sqlx::query_as(
            r#"
            SELECT pc.id AS punch_card_id, pc.business_id, b.name AS business_name,
                   pc.name, pc.reward_description, pc.punches_required,
                   pcc.punches_count, pcc.completed_at, pc.is_active
            FROM punch_card_customers pcc
            JOIN punch_cards pc ON pc.id = pcc.punch_card_id
            JOIN businesses b ON b.id = pc.business_id
            WHERE pcc.customer_id = $1
            ORDER BY pcc.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn enrolled_customers(
        &self,
        business_id: Uuid,
        card_id: Uuid,
    ) -> ServiceResult<Vec<EnrolledCustomer>> {
        // Ownership check before exposing membership data
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM punch_cards WHERE id = $1 AND business_id = $2")
                .bind(card_id)
                .bind(business_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(ServiceError::not_found("Punch card not found"));
        }

        let rows: Vec<EnrolledCustomer> = sqlx::query_as(
            r#"
            SELECT c.id AS customer_id, c.display_name, pcc.punches_count,
                   pcc.completed_at, pcc.created_at AS joined_at
            FROM punch_card_customers pcc
            JOIN customers c ON c.id = pcc.customer_id
            WHERE pcc.punch_card_id = $1
            ORDER BY pcc.created_at
            "#,
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Record one punch. The increment is a conditional UPDATE joined to
    /// the card row, so two concurrent punches serialize in the database
    /// and the count can never pass `punches_required`. Completing the
    /// card stamps the membership and issues the reward code in the same
    /// transaction.
    pub async fn punch(
        &self,
        business_id: Uuid,
        card_id: Uuid,
        customer_id: Uuid,
        recorded_by: Uuid,
        note: Option<&str>,
    ) -> ServiceResult<PunchOutcome> {
        let card: PunchCard =
            sqlx::query_as("SELECT * FROM punch_cards WHERE id = $1 AND business_id = $2")
                .bind(card_id)
                .bind(business_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ServiceError::not_found("Punch card not found"))?;

        if !card.is_active {
            return Err(ServiceError::conflict("Punch card is no longer active"));
        }

        let customer: Customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Customer not found"))?;

        let mut tx = self.pool.begin().await?;

        // Walk-up flow: a customer punched at the counter is enrolled on
        // the spot.
        sqlx::query(
            r#"
            INSERT INTO punch_card_customers (punch_card_id, customer_id)
            VALUES ($1, $2)
            ON CONFLICT (punch_card_id, customer_id) DO NOTHING
            "#,
        )
        .bind(card_id)
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        let row: Option<(i32, i32)> = sqlx::query_as(
            r#"
            UPDATE punch_card_customers pcc
            SET punches_count = pcc.punches_count + 1
            FROM punch_cards pc
            WHERE pc.id = pcc.punch_card_id
              AND pcc.punch_card_id = $1 AND pcc.customer_id = $2
              AND pcc.completed_at IS NULL
              AND pcc.punches_count < pc.punches_required
            RETURNING pcc.punches_count, pc.punches_required
            "#,
        )
        .bind(card_id)
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (punches_count, punches_required) =
            row.ok_or_else(|| ServiceError::conflict("Punch card already completed"))?;

        sqlx::query(
            r#"
            INSERT INTO punch_card_punches (punch_card_id, customer_id, recorded_by, note)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(card_id)
        .bind(customer_id)
        .bind(recorded_by)
        .bind(note)
        .execute(&mut *tx)
        .await?;

        let mut reward_code = None;
        let completed = punches_count >= punches_required;

        if completed {
            sqlx::query(
                r#"
                UPDATE punch_card_customers
                SET completed_at = now()
                WHERE punch_card_id = $1 AND customer_id = $2 AND completed_at IS NULL
                "#,
            )
            .bind(card_id)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

            let redemption = RedemptionService::issue_in(
                &mut *tx,
                customer_id,
                business_id,
                RedemptionSource::PunchCard,
                None,
                0,
            )
            .await?;

            NotificationService::notify_in(
                &mut *tx,
                customer.account_id,
                "punch_card_completed",
                &format!("You completed \"{}\"", card.name),
                Some(&format!(
                    "Show code {} to claim: {}",
                    redemption.code, card.reward_description
                )),
            )
            .await?;

            reward_code = Some(redemption.code);
        }

        tx.commit().await?;

        Ok(PunchOutcome {
            punch_card_id: card_id,
            customer_id,
            punches_count,
            punches_required,
            completed,
            reward_code,
        })
    }

    /// Bulk punch: one result per customer, partial success reported
    /// rather than aborting the batch.
    pub async fn bulk_punch(
        &self,
        business_id: Uuid,
        card_id: Uuid,
        customer_ids: &[Uuid],
        recorded_by: Uuid,
    ) -> ServiceResult<Vec<BulkPunchResult>> {
        if customer_ids.is_empty() {
            return Err(ServiceError::invalid("customer_ids must not be empty"));
        }
        if customer_ids.len() > 100 {
            return Err(ServiceError::invalid("At most 100 customers per bulk punch"));
        }

        let mut results = Vec::with_capacity(customer_ids.len());
        for &customer_id in customer_ids {
            match self.punch(business_id, card_id, customer_id, recorded_by, None).await {
                Ok(outcome) => results.push(BulkPunchResult {
                    customer_id,
                    ok: true,
                    outcome: Some(outcome),
                    error: None,
                }),
                Err(ServiceError::Database(e)) => return Err(ServiceError::Database(e)),
                Err(e) => results.push(BulkPunchResult {
                    customer_id,
                    ok: false,
                    outcome: None,
                    error: Some(e.to_string()),
                }),
            }
        }
        Ok(results)
    }

    async fn progress(&self, card_id: Uuid, customer_id: Uuid) -> ServiceResult<PunchCardProgress> {
        sqlx::query_as(
            r#"
            SELECT pc.id AS punch_card_id, pc.business_id, b.name AS business_name,
                   pc.name, pc.reward_description, pc.punches_required,
                   pcc.punches_count, pcc.completed_at, pc.is_active
            FROM punch_card_customers pcc
            JOIN punch_cards pc ON pc.id = pcc.punch_card_id
            JOIN businesses b ON b.id = pc.business_id
            WHERE pcc.punch_card_id = $1 AND pcc.customer_id = $2
            "#,
        )
        .bind(card_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Membership not found"))
    }
}

fn validate_card_fields(name: &str, punches_required: i32, reward_description: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::invalid("Card name must not be empty"));
    }
    if !(1..=50).contains(&punches_required) {
        return Err(ServiceError::invalid("punches_required must be between 1 and 50"));
    }
    if reward_description.trim().is_empty() {
        return Err(ServiceError::invalid("Reward description must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_field_validation() {
        assert!(validate_card_fields("Coffee club", 10, "Free flat white").is_ok());
        assert!(validate_card_fields("", 10, "Free flat white").is_err());
        assert!(validate_card_fields("Coffee club", 0, "Free flat white").is_err());
        assert!(validate_card_fields("Coffee club", 51, "Free flat white").is_err());
        assert!(validate_card_fields("Coffee club", 10, "  ").is_err());
    }
}
