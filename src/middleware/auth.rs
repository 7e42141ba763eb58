use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::types::AccountRole;

/// Authenticated account context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub email: String,
    pub role: AccountRole,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims
            .account_role()
            .ok_or_else(|| ApiError::unauthorized("Unknown account role in token"))?;
        Ok(Self { account_id: claims.sub, email: claims.email, role })
    }
}

/// JWT authentication middleware that validates tokens and injects AuthUser
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Gate for `/api/business/*`: the token must belong to a business account.
/// Whether that account is bound to an approved business profile is checked
/// against the database in the handlers.
pub async fn require_business(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, AccountRole::Business, "Business account required")?;
    Ok(next.run(request).await)
}

/// Gate for `/api/admin/*`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, AccountRole::Admin, "Admin account required")?;
    Ok(next.run(request).await)
}

fn require_role(request: &Request, role: AccountRole, message: &str) -> Result<(), ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Missing authentication context"))?;

    if user.role != role {
        return Err(ApiError::forbidden(message));
    }
    Ok(())
}

/// Extract JWT token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_extraction_rejects_basic() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn bearer_extraction_rejects_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());
        headers.clear();
        assert!(extract_bearer_token(&headers).is_err());
    }
}
