use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{Business, Deal, DiscountOffer, ExclusiveOffer, PunchCard, Reward};
use crate::types::BusinessStatus;

use super::notification_service::NotificationService;
use super::{ServiceError, ServiceResult};

/// Directory detail: an approved business with everything currently live.
#[derive(Debug, Serialize)]
pub struct BusinessDetail {
    pub business: Business,
    pub punch_cards: Vec<PunchCard>,
    pub rewards: Vec<Reward>,
    pub discount_offers: Vec<DiscountOffer>,
    pub exclusive_offers: Vec<ExclusiveOffer>,
    pub deals: Vec<Deal>,
}

/// Aggregate counters for the business dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct BusinessAnalytics {
    pub enrolled_customers: i64,
    pub punches_total: i64,
    pub punches_last_30_days: i64,
    pub cards_completed: i64,
    pub redemptions_issued: i64,
    pub redemptions_used: i64,
    pub receipts_pending: i64,
    pub receipts_approved: i64,
    pub points_awarded: i64,
}

pub struct BusinessService {
    pool: PgPool,
}

impl BusinessService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Approved businesses for the public directory.
    pub async fn directory(
        &self,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Business>> {
        let rows: Vec<Business> = match category {
            Some(cat) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM businesses
                    WHERE status = 'approved' AND category = $1
                    ORDER BY name
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(cat)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM businesses
                    WHERE status = 'approved'
                    ORDER BY name
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Public detail view. Only approved businesses resolve.
    pub async fn directory_detail(&self, business_id: Uuid) -> ServiceResult<BusinessDetail> {
        let business: Business =
            sqlx::query_as("SELECT * FROM businesses WHERE id = $1 AND status = 'approved'")
                .bind(business_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ServiceError::not_found("Business not found"))?;

        let punch_cards: Vec<PunchCard> = sqlx::query_as(
            "SELECT * FROM punch_cards WHERE business_id = $1 AND is_active ORDER BY created_at",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let rewards: Vec<Reward> = sqlx::query_as(
            "SELECT * FROM rewards WHERE business_id = $1 AND is_active ORDER BY points_cost",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let discount_offers: Vec<DiscountOffer> = sqlx::query_as(
            r#"
            SELECT * FROM discount_offers
            WHERE business_id = $1 AND is_active
              AND (starts_at IS NULL OR starts_at <= now())
              AND (ends_at IS NULL OR ends_at > now())
            ORDER BY created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let exclusive_offers: Vec<ExclusiveOffer> = sqlx::query_as(
            r#"
            SELECT * FROM exclusive_offers
            WHERE business_id = $1 AND is_active AND quantity_claimed < quantity_total
            ORDER BY created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let deals: Vec<Deal> = sqlx::query_as(
            r#"
            SELECT * FROM deals
            WHERE business_id = $1
              AND (starts_at IS NULL OR starts_at <= now())
              AND (ends_at IS NULL OR ends_at > now())
            ORDER BY created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BusinessDetail { business, punch_cards, rewards, discount_offers, exclusive_offers, deals })
    }

    /// Currently-running deals across all approved businesses.
    pub async fn running_deals(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Deal>> {
        let rows: Vec<Deal> = sqlx::query_as(
            r#"
            SELECT d.* FROM deals d
            JOIN businesses b ON b.id = d.business_id
            WHERE b.status = 'approved'
              AND (d.starts_at IS NULL OR d.starts_at <= now())
              AND (d.ends_at IS NULL OR d.ends_at > now())
            ORDER BY d.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The approved business bound to an authenticated business account.
    /// This is the ownership check every `/api/business/*` handler runs.
    pub async fn approved_for_account(&self, account_id: Uuid) -> ServiceResult<Business> {
        let business: Business = sqlx::query_as("SELECT * FROM businesses WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::forbidden("No business profile for this account"))?;

        match BusinessStatus::parse(&business.status) {
            Some(BusinessStatus::Approved) => Ok(business),
            Some(BusinessStatus::Pending) => {
                Err(ServiceError::forbidden("Business is awaiting approval"))
            }
            Some(BusinessStatus::Suspended) => Err(ServiceError::forbidden("Business is suspended")),
            None => Err(ServiceError::Internal(format!(
                "unknown business status '{}'",
                business.status
            ))),
        }
    }

    /// Dashboard counters, one aggregate query per area.
    pub async fn analytics(&self, business_id: Uuid) -> ServiceResult<BusinessAnalytics> {
        let analytics: BusinessAnalytics = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(DISTINCT pcc.customer_id)
                 FROM punch_card_customers pcc
                 JOIN punch_cards pc ON pc.id = pcc.punch_card_id
                 WHERE pc.business_id = $1)                                          AS enrolled_customers,
                (SELECT COUNT(*)
                 FROM punch_card_punches p
                 JOIN punch_cards pc ON pc.id = p.punch_card_id
                 WHERE pc.business_id = $1)                                          AS punches_total,
                (SELECT COUNT(*)
                 FROM punch_card_punches p
                 JOIN punch_cards pc ON pc.id = p.punch_card_id
                 WHERE pc.business_id = $1
                   AND p.created_at > now() - INTERVAL '30 days')                    AS punches_last_30_days,
                (SELECT COUNT(*)
                 FROM punch_card_customers pcc
                 JOIN punch_cards pc ON pc.id = pcc.punch_card_id
                 WHERE pc.business_id = $1 AND pcc.completed_at IS NOT NULL)         AS cards_completed,
                (SELECT COUNT(*) FROM redemptions
                 WHERE business_id = $1)                                             AS redemptions_issued,
                (SELECT COUNT(*) FROM redemptions
                 WHERE business_id = $1 AND status = 'used')                         AS redemptions_used,
                (SELECT COUNT(*) FROM receipts
                 WHERE business_id = $1 AND status = 'pending')                      AS receipts_pending,
                (SELECT COUNT(*) FROM receipts
                 WHERE business_id = $1 AND status = 'approved')                     AS receipts_approved,
                (SELECT COALESCE(SUM(delta), 0)::BIGINT FROM point_entries
                 WHERE business_id = $1 AND delta > 0)                               AS points_awarded
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(analytics)
    }

    /// Admin registry view, optionally filtered by status.
    pub async fn admin_list(
        &self,
        status: Option<BusinessStatus>,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<Business>> {
        let rows: Vec<Business> = match status {
            Some(s) => {
                sqlx::query_as(
                    "SELECT * FROM businesses WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(s.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM businesses ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// `pending -> approved`. The guarded UPDATE makes approval idempotent
    /// under concurrent admin clicks: only one transition wins.
    pub async fn approve(&self, business_id: Uuid) -> ServiceResult<Business> {
        let mut tx = self.pool.begin().await?;

        let business: Business = sqlx::query_as(
            r#"
            UPDATE businesses
            SET status = 'approved', suspended_reason = NULL, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::conflict("Business is not pending approval"))?;

        NotificationService::notify_in(
            &mut *tx,
            business.account_id,
            "business_approved",
            "Your business has been approved",
            Some(&format!("{} is now live in the directory.", business.name)),
        )
        .await?;

        tx.commit().await?;
        Ok(business)
    }

    /// `approved -> suspended`, reason required.
    pub async fn suspend(&self, business_id: Uuid, reason: &str) -> ServiceResult<Business> {
        if reason.trim().is_empty() {
            return Err(ServiceError::invalid("Suspension reason is required"));
        }

        let mut tx = self.pool.begin().await?;

        let business: Business = sqlx::query_as(
            r#"
            UPDATE businesses
            SET status = 'suspended', suspended_reason = $2, updated_at = now()
            WHERE id = $1 AND status = 'approved'
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(reason.trim())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::conflict("Business is not currently approved"))?;

        NotificationService::notify_in(
            &mut *tx,
            business.account_id,
            "business_suspended",
            "Your business has been suspended",
            Some(reason.trim()),
        )
        .await?;

        tx.commit().await?;
        Ok(business)
    }

    /// `suspended -> approved`.
    pub async fn restore(&self, business_id: Uuid) -> ServiceResult<Business> {
        let mut tx = self.pool.begin().await?;

        let business: Business = sqlx::query_as(
            r#"
            UPDATE businesses
            SET status = 'approved', suspended_reason = NULL, updated_at = now()
            WHERE id = $1 AND status = 'suspended'
            RETURNING *
            "#,
        )
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::conflict("Business is not suspended"))?;

        NotificationService::notify_in(
            &mut *tx,
            business.account_id,
            "business_restored",
            "Your business has been restored",
            None,
        )
        .await?;

        tx.commit().await?;
        Ok(business)
    }
}
