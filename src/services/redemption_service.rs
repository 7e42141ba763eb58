use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::generate_redemption_code;
use crate::database::models::{DiscountOffer, ExclusiveOffer, Redemption, Reward};
use crate::types::{PointReason, RedemptionSource};

use super::notification_service::NotificationService;
use super::points_service::PointsService;
use super::{ServiceError, ServiceResult};

pub struct RedemptionService {
    pool: PgPool,
}

impl RedemptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a redemption with a freshly minted code inside an open
    /// transaction. Retries on the (unlikely) code collision; the UNIQUE
    /// constraint is the authority.
    pub async fn issue_in(
        conn: &mut PgConnection,
        customer_id: Uuid,
        business_id: Uuid,
        source: RedemptionSource,
        source_ref: Option<Uuid>,
        points_spent: i64,
    ) -> ServiceResult<Redemption> {
        let (reward_id, discount_offer_id, exclusive_offer_id) = match source {
            RedemptionSource::Reward => (source_ref, None, None),
            RedemptionSource::DiscountOffer => (None, source_ref, None),
            RedemptionSource::ExclusiveOffer => (None, None, source_ref),
            RedemptionSource::PunchCard => (None, None, None),
        };

        for _ in 0..3 {
            let code = generate_redemption_code();
            let attempt: Result<Redemption, sqlx::Error> = sqlx::query_as(
                r#"
                INSERT INTO redemptions
                    (customer_id, business_id, reward_id, discount_offer_id, exclusive_offer_id,
                     source, code, points_spent)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(customer_id)
            .bind(business_id)
            .bind(reward_id)
            .bind(discount_offer_id)
            .bind(exclusive_offer_id)
            .bind(source.as_str())
            .bind(&code)
            .bind(points_spent)
            .fetch_one(&mut *conn)
            .await;

            match attempt {
                Ok(redemption) => return Ok(redemption),
                Err(e) if is_unique_violation(&e, "redemptions_code_key") => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Internal("could not mint a unique redemption code".to_string()))
    }

    /// Exchange points for a reward. Inventory decrement, points debit,
    /// and code issue share one transaction; every guard is a conditional
    /// UPDATE, so concurrent redemptions cannot oversell or overdraw.
    pub async fn redeem_reward(&self, customer_id: Uuid, reward_id: Uuid) -> ServiceResult<Redemption> {
        let reward: Reward = sqlx::query_as(
            r#"
            SELECT r.* FROM rewards r
            JOIN businesses b ON b.id = r.business_id
            WHERE r.id = $1 AND r.is_active AND b.status = 'approved'
            "#,
        )
        .bind(reward_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Reward not found"))?;

        let mut tx = self.pool.begin().await?;

        if reward.inventory.is_some() {
            let taken: Option<(i32,)> = sqlx::query_as(
                r#"
                UPDATE rewards
                SET inventory = inventory - 1, updated_at = now()
                WHERE id = $1 AND inventory > 0
                RETURNING inventory
                "#,
            )
            .bind(reward_id)
            .fetch_optional(&mut *tx)
            .await?;

            if taken.is_none() {
                return Err(ServiceError::conflict("Reward is sold out"));
            }
        }

        PointsService::debit_in(
            &mut *tx,
            customer_id,
            reward.points_cost,
            PointReason::Redemption,
            Some(reward.business_id),
            Some(reward_id),
            Some(&reward.name),
        )
        .await?;

        let redemption = Self::issue_in(
            &mut *tx,
            customer_id,
            reward.business_id,
            RedemptionSource::Reward,
            Some(reward_id),
            reward.points_cost,
        )
        .await?;

        tx.commit().await?;
        Ok(redemption)
    }

    /// Claim a percent-off discount offer.
    pub async fn claim_discount(&self, customer_id: Uuid, offer_id: Uuid) -> ServiceResult<Redemption> {
        let offer: DiscountOffer = sqlx::query_as(
            r#"
            SELECT o.* FROM discount_offers o
            JOIN businesses b ON b.id = o.business_id
            WHERE o.id = $1 AND o.is_active AND b.status = 'approved'
              AND (o.starts_at IS NULL OR o.starts_at <= now())
              AND (o.ends_at IS NULL OR o.ends_at > now())
            "#,
        )
        .bind(offer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Offer not found"))?;

        let mut tx = self.pool.begin().await?;

        if offer.points_cost > 0 {
            PointsService::debit_in(
                &mut *tx,
                customer_id,
                offer.points_cost,
                PointReason::Redemption,
                Some(offer.business_id),
                Some(offer_id),
                Some(&offer.title),
            )
            .await?;
        }

        let redemption = Self::issue_in(
            &mut *tx,
            customer_id,
            offer.business_id,
            RedemptionSource::DiscountOffer,
            Some(offer_id),
            offer.points_cost,
        )
        .await?;

        tx.commit().await?;
        Ok(redemption)
    }

    /// Claim a limited-quantity exclusive offer. The quantity guard is the
    /// conditional UPDATE; losing the race is a conflict.
    pub async fn claim_exclusive(&self, customer_id: Uuid, offer_id: Uuid) -> ServiceResult<Redemption> {
        let mut tx = self.pool.begin().await?;

        let offer: Option<ExclusiveOffer> = sqlx::query_as(
            r#"
            UPDATE exclusive_offers o
            SET quantity_claimed = o.quantity_claimed + 1, updated_at = now()
            FROM businesses b
            WHERE b.id = o.business_id AND b.status = 'approved'
              AND o.id = $1 AND o.is_active
              AND o.quantity_claimed < o.quantity_total
            RETURNING o.*
            "#,
        )
        .bind(offer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let offer = match offer {
            Some(o) => o,
            None => {
                // Distinguish "gone" from "never existed" for the client
                let exists: Option<(Uuid,)> =
                    sqlx::query_as("SELECT id FROM exclusive_offers WHERE id = $1")
                        .bind(offer_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match exists {
                    Some(_) => ServiceError::conflict("Offer is fully claimed"),
                    None => ServiceError::not_found("Offer not found"),
                });
            }
        };

        if offer.points_cost > 0 {
            PointsService::debit_in(
                &mut *tx,
                customer_id,
                offer.points_cost,
                PointReason::Redemption,
                Some(offer.business_id),
                Some(offer_id),
                Some(&offer.title),
            )
            .await?;
        }

        let redemption = Self::issue_in(
            &mut *tx,
            customer_id,
            offer.business_id,
            RedemptionSource::ExclusiveOffer,
            Some(offer_id),
            offer.points_cost,
        )
        .await?;

        tx.commit().await?;
        Ok(redemption)
    }

    pub async fn redemptions_for_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Redemption>> {
        let rows: Vec<Redemption> = sqlx::query_as(
            r#"
            SELECT * FROM redemptions
            WHERE customer_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Consume a presented code. The `issued -> used` transition is one
    /// guarded UPDATE: the first caller wins, every replay conflicts.
    pub async fn verify_code(&self, business_id: Uuid, code: &str) -> ServiceResult<Redemption> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ServiceError::invalid("Code must not be empty"));
        }

        let mut tx = self.pool.begin().await?;

        let used: Option<Redemption> = sqlx::query_as(
            r#"
            UPDATE redemptions
            SET status = 'used', used_at = now()
            WHERE code = $1 AND business_id = $2 AND status = 'issued'
            RETURNING *
            "#,
        )
        .bind(&code)
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?;

        let redemption = match used {
            Some(r) => r,
            None => {
                let existing: Option<Redemption> =
                    sqlx::query_as("SELECT * FROM redemptions WHERE code = $1 AND business_id = $2")
                        .bind(&code)
                        .bind(business_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match existing {
                    Some(r) => ServiceError::conflict(format!("Code already {}", r.status)),
                    None => ServiceError::not_found("Unknown code"),
                });
            }
        };

        let account: Option<(Uuid,)> =
            sqlx::query_as("SELECT account_id FROM customers WHERE id = $1")
                .bind(redemption.customer_id)
                .fetch_optional(&mut *tx)
                .await?;

        if let Some((account_id,)) = account {
            NotificationService::notify_in(
                &mut *tx,
                account_id,
                "redemption_verified",
                "Your reward was redeemed",
                Some(&format!("Code {} has been used.", redemption.code)),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(redemption)
    }
}

/// True when `err` is a Postgres unique violation on `constraint`.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
        }
        _ => false,
    }
}
