use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::{Account, Business, Customer};
use crate::types::{AccountRole, PointReason};

use super::affiliate_service::AffiliateService;
use super::{ServiceError, ServiceResult};
use super::points_service::PointsService;

#[derive(Debug, Serialize)]
pub struct AuthenticatedSession {
    pub token: String,
    pub account_id: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub account_id: Uuid,
    pub email: String,
    pub role: AccountRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<Business>,
}

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a customer account. Signup bonus and (when the feature is
    /// enabled) affiliate attribution land in the same transaction as the
    /// account itself.
    pub async fn register_customer(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        referral_code: Option<&str>,
    ) -> ServiceResult<AuthenticatedSession> {
        validate_email(email)?;
        validate_password(password)?;
        if display_name.trim().is_empty() {
            return Err(ServiceError::invalid("Display name must not be empty"));
        }

        if self.email_exists(email).await? {
            return Err(ServiceError::conflict("An account with this email already exists"));
        }

        let password_hash = auth::hash_password(password)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))?;

        let economy = &config::config().economy;
        let mut tx = self.pool.begin().await?;

        let account: Account = sqlx::query_as(
            r#"
            INSERT INTO accounts (email, password_hash, role)
            VALUES ($1, $2, 'customer')
            RETURNING *
            "#,
        )
        .bind(email.to_lowercase())
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        let customer: Customer = sqlx::query_as(
            r#"
            INSERT INTO customers (account_id, display_name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(display_name.trim())
        .fetch_one(&mut *tx)
        .await?;

        if economy.signup_bonus_points > 0 {
            PointsService::credit_in(
                &mut *tx,
                customer.id,
                economy.signup_bonus_points,
                PointReason::SignupBonus,
                None,
                None,
                None,
            )
            .await?;
        }

        // Attribution is best-effort: an unknown or inactive code never
        // blocks signup.
        if economy.affiliates_enabled {
            if let Some(code) = referral_code {
                AffiliateService::attribute_signup_in(&mut *tx, code, customer.id).await?;
            }
        }

        tx.commit().await?;

        Ok(self.session_for(&account)?)
    }

    /// Register a business account; the profile starts `pending` and waits
    /// for admin approval before it appears anywhere.
    pub async fn register_business(
        &self,
        email: &str,
        password: &str,
        business_name: &str,
        category: Option<&str>,
        description: Option<&str>,
        address: Option<&str>,
    ) -> ServiceResult<AuthenticatedSession> {
        validate_email(email)?;
        validate_password(password)?;
        if business_name.trim().is_empty() {
            return Err(ServiceError::invalid("Business name must not be empty"));
        }

        if self.email_exists(email).await? {
            return Err(ServiceError::conflict("An account with this email already exists"));
        }

        let password_hash = auth::hash_password(password)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        let account: Account = sqlx::query_as(
            r#"
            INSERT INTO accounts (email, password_hash, role)
            VALUES ($1, $2, 'business')
            RETURNING *
            "#,
        )
        .bind(email.to_lowercase())
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO businesses (account_id, name, category, description, address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id)
        .bind(business_name.trim())
        .bind(category)
        .bind(description)
        .bind(address)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(self.session_for(&account)?)
    }

    /// Verify credentials and mint a session token. A suspended business
    /// can still log in; the business route guard is what locks it out.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthenticatedSession> {
        let account: Account = sqlx::query_as("SELECT * FROM accounts WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::forbidden("Invalid email or password"))?;

        let ok = auth::verify_password(password, &account.password_hash)
            .map_err(|e| ServiceError::Internal(format!("password verification failed: {}", e)))?;
        if !ok {
            return Err(ServiceError::forbidden("Invalid email or password"));
        }

        Ok(self.session_for(&account)?)
    }

    /// Re-issue a token for an already-authenticated account.
    pub async fn refresh(&self, account_id: Uuid) -> ServiceResult<AuthenticatedSession> {
        let account: Account = sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account not found"))?;

        Ok(self.session_for(&account)?)
    }

    /// Current account plus its role profile.
    pub async fn profile(&self, account_id: Uuid) -> ServiceResult<Profile> {
        let account: Account = sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account not found"))?;

        let role = AccountRole::parse(&account.role)
            .ok_or_else(|| ServiceError::Internal(format!("unknown role '{}' on account", account.role)))?;

        let customer: Option<Customer> = match role {
            AccountRole::Customer => {
                sqlx::query_as("SELECT * FROM customers WHERE account_id = $1")
                    .bind(account.id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            _ => None,
        };

        let business: Option<Business> = match role {
            AccountRole::Business => {
                sqlx::query_as("SELECT * FROM businesses WHERE account_id = $1")
                    .bind(account.id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            _ => None,
        };

        Ok(Profile { account_id: account.id, email: account.email, role, customer, business })
    }

    /// Resolve the customer profile backing an authenticated account.
    pub async fn customer_for_account(&self, account_id: Uuid) -> ServiceResult<Customer> {
        sqlx::query_as("SELECT * FROM customers WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::forbidden("Customer profile required"))
    }

    async fn email_exists(&self, email: &str) -> ServiceResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    fn session_for(&self, account: &Account) -> ServiceResult<AuthenticatedSession> {
        let role = AccountRole::parse(&account.role)
            .ok_or_else(|| ServiceError::Internal(format!("unknown role '{}' on account", account.role)))?;

        let claims = Claims::new(account.id, account.email.clone(), role);
        let token = auth::generate_jwt(&claims)
            .map_err(|e| ServiceError::Internal(format!("token generation failed: {}", e)))?;

        Ok(AuthenticatedSession {
            token,
            account_id: account.id,
            email: account.email.clone(),
            role,
            expires_in: config::config().security.jwt_expiry_hours * 3600,
        })
    }
}

pub(crate) fn validate_email(email: &str) -> ServiceResult<()> {
    if email.is_empty() {
        return Err(ServiceError::invalid("Email must not be empty"));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ServiceError::invalid("Invalid email format"));
    }

    Ok(())
}

pub(crate) fn validate_password(password: &str) -> ServiceResult<()> {
    if password.len() < 8 {
        return Err(ServiceError::invalid("Password must be at least 8 characters"));
    }
    if password.len() > 128 {
        return Err(ServiceError::invalid("Password must be at most 128 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("ana@host").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }
}
