use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::middleware::auth::extract_bearer_token;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::account_service::AuthenticatedSession;
use crate::services::AccountService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// "customer" (default) or "business"
    pub role: Option<String>,
    pub email: String,
    pub password: String,

    // customer fields
    pub display_name: Option<String>,
    /// Optional affiliate referral code; ignored unless the program is on.
    #[serde(rename = "ref")]
    pub referral_code: Option<String>,

    // business fields
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register - create a customer or business account
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthenticatedSession> {
    let role = payload.role.as_deref().unwrap_or("customer");

    match role {
        "customer" => {
            let display_name = payload
                .display_name
                .as_deref()
                .ok_or_else(|| ApiError::invalid_field("display_name", "This field is required"))?;

            let pool = super::super::pool().await?;
            let session = AccountService::new(pool)
                .register_customer(
                    &payload.email,
                    &payload.password,
                    display_name,
                    payload.referral_code.as_deref(),
                )
                .await?;
            Ok(ApiResponse::created(session))
        }
        "business" => {
            let business_name = payload
                .business_name
                .as_deref()
                .ok_or_else(|| ApiError::invalid_field("business_name", "This field is required"))?;

            let pool = super::super::pool().await?;
            let session = AccountService::new(pool)
                .register_business(
                    &payload.email,
                    &payload.password,
                    business_name,
                    payload.category.as_deref(),
                    payload.description.as_deref(),
                    payload.address.as_deref(),
                )
                .await?;
            Ok(ApiResponse::created(session))
        }
        other => Err(ApiError::invalid_field(
            "role",
            format!("Unknown role '{}'; expected customer or business", other),
        )),
    }
}

/// POST /auth/login - verify credentials and mint a token
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<AuthenticatedSession> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let pool = super::super::pool().await?;
    let session = AccountService::new(pool).login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::success(session))
}

/// POST /auth/refresh - exchange a still-valid token for a fresh one
pub async fn refresh(headers: HeaderMap) -> ApiResult<AuthenticatedSession> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let pool = super::super::pool().await?;
    let session = AccountService::new(pool).refresh(claims.sub).await?;
    Ok(ApiResponse::success(session))
}
