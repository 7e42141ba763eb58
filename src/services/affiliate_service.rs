use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::generate_affiliate_code;
use crate::config;
use crate::database::models::AffiliateLink;
use crate::types::PointReason;

use super::points_service::PointsService;
use super::redemption_service::is_unique_violation;
use super::{ServiceError, ServiceResult};

#[derive(Debug, Serialize)]
pub struct ResolvedLink {
    pub code: String,
    pub target_url: String,
}

/// Influencer referral links. Fully built, globally dark: every entry
/// point checks `economy.affiliates_enabled` first.
pub struct AffiliateService {
    pool: PgPool,
}

impl AffiliateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn ensure_enabled() -> ServiceResult<()> {
        if !config::config().economy.affiliates_enabled {
            return Err(ServiceError::forbidden("Affiliate program is not enabled"));
        }
        Ok(())
    }

    /// Resolve a public `/r/:code` hit and count the click. Looks like a
    /// plain 404 whenever the feature is off.
    pub async fn resolve_click(&self, code: &str) -> ServiceResult<ResolvedLink> {
        if !config::config().economy.affiliates_enabled {
            return Err(ServiceError::not_found("Unknown link"));
        }

        let link: AffiliateLink = sqlx::query_as(
            r#"
            UPDATE affiliate_links
            SET clicks = clicks + 1
            WHERE code = $1 AND is_active
            RETURNING *
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Unknown link"))?;

        Ok(ResolvedLink { code: link.code, target_url: link.target_url })
    }

    /// Attribute a fresh signup to a referral code, inside the signup
    /// transaction. Best-effort on purpose: unknown or inactive codes are
    /// ignored, a second attribution for the same customer is ignored.
    pub async fn attribute_signup_in(
        conn: &mut PgConnection,
        code: &str,
        customer_id: Uuid,
    ) -> ServiceResult<()> {
        let link: Option<AffiliateLink> =
            sqlx::query_as("SELECT * FROM affiliate_links WHERE code = $1 AND is_active")
                .bind(code.trim())
                .fetch_optional(&mut *conn)
                .await?;

        let link = match link {
            Some(l) => l,
            None => return Ok(()),
        };

        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO affiliate_attributions (link_id, customer_id)
            VALUES ($1, $2)
            ON CONFLICT (customer_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(link.id)
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

        if inserted.is_some() {
            let bonus = config::config().economy.affiliate_bonus_points;
            if bonus > 0 {
                PointsService::credit_in(
                    &mut *conn,
                    customer_id,
                    bonus,
                    PointReason::AffiliateBonus,
                    None,
                    Some(link.id),
                    Some(&link.influencer_name),
                )
                .await?;
            }
        }

        Ok(())
    }

    // --- admin surface ---

    pub async fn admin_list(&self, limit: i64, offset: i64) -> ServiceResult<Vec<AffiliateLink>> {
        Self::ensure_enabled()?;

        let rows: Vec<AffiliateLink> = sqlx::query_as(
            "SELECT * FROM affiliate_links ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn admin_create(
        &self,
        influencer_name: &str,
        target_url: &str,
    ) -> ServiceResult<AffiliateLink> {
        Self::ensure_enabled()?;

        if influencer_name.trim().is_empty() {
            return Err(ServiceError::invalid("influencer_name must not be empty"));
        }
        url::Url::parse(target_url).map_err(|_| ServiceError::invalid("target_url must be a valid URL"))?;

        for _ in 0..3 {
            let code = generate_affiliate_code();
            let attempt: Result<AffiliateLink, sqlx::Error> = sqlx::query_as(
                r#"
                INSERT INTO affiliate_links (influencer_name, code, target_url)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(influencer_name.trim())
            .bind(&code)
            .bind(target_url)
            .fetch_one(&self.pool)
            .await;

            match attempt {
                Ok(link) => return Ok(link),
                Err(e) if is_unique_violation(&e, "affiliate_links_code_key") => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Internal("could not mint a unique affiliate code".to_string()))
    }

    pub async fn admin_deactivate(&self, link_id: Uuid) -> ServiceResult<AffiliateLink> {
        Self::ensure_enabled()?;

        sqlx::query_as(
            "UPDATE affiliate_links SET is_active = FALSE WHERE id = $1 RETURNING *",
        )
        .bind(link_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Affiliate link not found"))
    }
}
