use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use chrono::{DateTime, Utc};

use crate::database::models::{Deal, DiscountOffer, ExclusiveOffer, Reward};

use super::{ServiceError, ServiceResult};

/// Customer-facing view of everything claimable at a business.
#[derive(Debug, Serialize)]
pub struct OfferCatalog {
    pub discount_offers: Vec<DiscountOffer>,
    pub exclusive_offers: Vec<ExclusiveOffer>,
}

/// Business-side management of rewards, offers, and deals.
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- rewards ---

    pub async fn create_reward(
        &self,
        business_id: Uuid,
        name: &str,
        description: Option<&str>,
        points_cost: i64,
        inventory: Option<i32>,
    ) -> ServiceResult<Reward> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid("Reward name must not be empty"));
        }
        if points_cost <= 0 {
            return Err(ServiceError::invalid("points_cost must be positive"));
        }
        if let Some(n) = inventory {
            if n < 0 {
                return Err(ServiceError::invalid("inventory must not be negative"));
            }
        }

        let reward: Reward = sqlx::query_as(
            r#"
            INSERT INTO rewards (business_id, name, description, points_cost, inventory)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(name.trim())
        .bind(description)
        .bind(points_cost)
        .bind(inventory)
        .fetch_one(&self.pool)
        .await?;
        Ok(reward)
    }

    pub async fn rewards_for_business(&self, business_id: Uuid) -> ServiceResult<Vec<Reward>> {
        let rows: Vec<Reward> =
            sqlx::query_as("SELECT * FROM rewards WHERE business_id = $1 ORDER BY created_at")
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn update_reward(
        &self,
        business_id: Uuid,
        reward_id: Uuid,
        name: &str,
        description: Option<&str>,
        points_cost: i64,
        inventory: Option<i32>,
        is_active: bool,
    ) -> ServiceResult<Reward> {
        if name.trim().is_empty() {
            return Err(ServiceError::invalid("Reward name must not be empty"));
        }
        if points_cost <= 0 {
            return Err(ServiceError::invalid("points_cost must be positive"));
        }

        sqlx::query_as(
            r#"
            UPDATE rewards
            SET name = $3, description = $4, points_cost = $5, inventory = $6,
                is_active = $7, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(reward_id)
        .bind(business_id)
        .bind(name.trim())
        .bind(description)
        .bind(points_cost)
        .bind(inventory)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Reward not found"))
    }

    pub async fn deactivate_reward(&self, business_id: Uuid, reward_id: Uuid) -> ServiceResult<Reward> {
        sqlx::query_as(
            r#"
            UPDATE rewards SET is_active = FALSE, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(reward_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Reward not found"))
    }

    /// Active rewards at an approved business, cheapest first.
    pub async fn active_rewards(&self, business_id: Uuid) -> ServiceResult<Vec<Reward>> {
        let rows: Vec<Reward> = sqlx::query_as(
            r#"
            SELECT r.* FROM rewards r
            JOIN businesses b ON b.id = r.business_id
            WHERE r.business_id = $1 AND r.is_active AND b.status = 'approved'
            ORDER BY r.points_cost
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // --- discount offers ---

    pub async fn create_discount(
        &self,
        business_id: Uuid,
        title: &str,
        percent_off: i32,
        points_cost: i64,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> ServiceResult<DiscountOffer> {
        validate_offer(title, points_cost)?;
        if !(1..=100).contains(&percent_off) {
            return Err(ServiceError::invalid("percent_off must be between 1 and 100"));
        }
        validate_window(starts_at, ends_at)?;

        let offer: DiscountOffer = sqlx::query_as(
            r#"
            INSERT INTO discount_offers (business_id, title, percent_off, points_cost, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(title.trim())
        .bind(percent_off)
        .bind(points_cost)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(offer)
    }

    pub async fn discounts_for_business(&self, business_id: Uuid) -> ServiceResult<Vec<DiscountOffer>> {
        let rows: Vec<DiscountOffer> =
            sqlx::query_as("SELECT * FROM discount_offers WHERE business_id = $1 ORDER BY created_at")
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn deactivate_discount(
        &self,
        business_id: Uuid,
        offer_id: Uuid,
    ) -> ServiceResult<DiscountOffer> {
        sqlx::query_as(
            r#"
            UPDATE discount_offers SET is_active = FALSE, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(offer_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Offer not found"))
    }

    // --- exclusive offers ---

    pub async fn create_exclusive(
        &self,
        business_id: Uuid,
        title: &str,
        description: Option<&str>,
        points_cost: i64,
        quantity_total: i32,
    ) -> ServiceResult<ExclusiveOffer> {
        validate_offer(title, points_cost)?;
        if quantity_total <= 0 {
            return Err(ServiceError::invalid("quantity_total must be positive"));
        }

        let offer: ExclusiveOffer = sqlx::query_as(
            r#"
            INSERT INTO exclusive_offers (business_id, title, description, points_cost, quantity_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(title.trim())
        .bind(description)
        .bind(points_cost)
        .bind(quantity_total)
        .fetch_one(&self.pool)
        .await?;
        Ok(offer)
    }

    pub async fn exclusives_for_business(&self, business_id: Uuid) -> ServiceResult<Vec<ExclusiveOffer>> {
        let rows: Vec<ExclusiveOffer> =
            sqlx::query_as("SELECT * FROM exclusive_offers WHERE business_id = $1 ORDER BY created_at")
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn deactivate_exclusive(
        &self,
        business_id: Uuid,
        offer_id: Uuid,
    ) -> ServiceResult<ExclusiveOffer> {
        sqlx::query_as(
            r#"
            UPDATE exclusive_offers SET is_active = FALSE, updated_at = now()
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(offer_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Offer not found"))
    }

    /// What a customer sees at a business: live discounts plus exclusives
    /// with remaining quantity.
    pub async fn offers_at_business(&self, business_id: Uuid) -> ServiceResult<OfferCatalog> {
        let discount_offers: Vec<DiscountOffer> = sqlx::query_as(
            r#"
            SELECT o.* FROM discount_offers o
            JOIN businesses b ON b.id = o.business_id
            WHERE o.business_id = $1 AND o.is_active AND b.status = 'approved'
              AND (o.starts_at IS NULL OR o.starts_at <= now())
              AND (o.ends_at IS NULL OR o.ends_at > now())
            ORDER BY o.created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let exclusive_offers: Vec<ExclusiveOffer> = sqlx::query_as(
            r#"
            SELECT o.* FROM exclusive_offers o
            JOIN businesses b ON b.id = o.business_id
            WHERE o.business_id = $1 AND o.is_active AND b.status = 'approved'
              AND o.quantity_claimed < o.quantity_total
            ORDER BY o.created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OfferCatalog { discount_offers, exclusive_offers })
    }

    // --- deals ---

    pub async fn create_deal(
        &self,
        business_id: Uuid,
        title: &str,
        body: Option<&str>,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> ServiceResult<Deal> {
        if title.trim().is_empty() {
            return Err(ServiceError::invalid("Deal title must not be empty"));
        }
        validate_window(starts_at, ends_at)?;

        let deal: Deal = sqlx::query_as(
            r#"
            INSERT INTO deals (business_id, title, body, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(title.trim())
        .bind(body)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(deal)
    }

    pub async fn deals_for_business(&self, business_id: Uuid) -> ServiceResult<Vec<Deal>> {
        let rows: Vec<Deal> =
            sqlx::query_as("SELECT * FROM deals WHERE business_id = $1 ORDER BY created_at DESC")
                .bind(business_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn delete_deal(&self, business_id: Uuid, deal_id: Uuid) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1 AND business_id = $2")
            .bind(deal_id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Deal not found"));
        }
        Ok(())
    }
}

fn validate_offer(title: &str, points_cost: i64) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::invalid("Offer title must not be empty"));
    }
    if points_cost < 0 {
        return Err(ServiceError::invalid("points_cost must not be negative"));
    }
    Ok(())
}

fn validate_window(starts_at: Option<DateTime<Utc>>, ends_at: Option<DateTime<Utc>>) -> ServiceResult<()> {
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end <= start {
            return Err(ServiceError::invalid("ends_at must be after starts_at"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn offer_validation() {
        assert!(validate_offer("Happy hour", 0).is_ok());
        assert!(validate_offer("", 10).is_err());
        assert!(validate_offer("Happy hour", -1).is_err());
    }

    #[test]
    fn window_validation() {
        let now = Utc::now();
        assert!(validate_window(None, None).is_ok());
        assert!(validate_window(Some(now), Some(now + Duration::hours(1))).is_ok());
        assert!(validate_window(Some(now), Some(now)).is_err());
        assert!(validate_window(Some(now), Some(now - Duration::hours(1))).is_err());
    }
}
