//! # Authentication Module
//!
//! Stateless bearer-token authentication:
//!
//! ```text
//! 1. Login/register issues a signed JWT (subject = user id)
//!                ↓
//! 2. Client sends `Authorization: Bearer <token>`
//!                ↓
//! 3. The AuthUser extractor verifies the signature and expiry
//!                ↓
//! 4. The account row is loaded and checked for is_active
//!                ↓
//! 5. Handler receives the authenticated UserRecord
//! ```
//!
//! `AdminUser` layers a role check on top; everything else is identical.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::error::InternalError;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::db::{Role, UserRecord};
use crate::models::responses::ApiResponse;
use crate::AppState;

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token creation or verification failed.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user id the token was issued to.
    pub sub: Uuid,

    /// Expiry, seconds since the epoch.
    pub exp: i64,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,
}

/// Issue a signed token for a user.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    expire_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::hours(expire_hours)).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verify a token's signature and expiry, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn unauthorized(message: &str) -> actix_web::Error {
    let response =
        HttpResponse::Unauthorized().json(ApiResponse::<()>::error("UNAUTHORIZED", message));
    InternalError::from_response(message.to_string(), response).into()
}

fn forbidden(message: &str) -> actix_web::Error {
    let response =
        HttpResponse::Forbidden().json(ApiResponse::<()>::error("FORBIDDEN", message));
    InternalError::from_response(message.to_string(), response).into()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

async fn authenticate(req: HttpRequest) -> Result<UserRecord, actix_web::Error> {
    let state = req
        .app_data::<web::Data<Arc<AppState>>>()
        .ok_or_else(|| unauthorized("Authentication unavailable"))?;

    let token =
        bearer_token(&req).ok_or_else(|| unauthorized("Missing bearer token"))?;

    let claims = verify_token(&token, &state.config.jwt_secret).map_err(|e| {
        debug!("Token verification failed: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user = queries::get_user_by_id(state.db.pool(), claims.sub)
        .await
        .map_err(|e| {
            warn!("User lookup failed during authentication: {}", e);
            unauthorized("Authentication failed")
        })?
        .ok_or_else(|| unauthorized("Account no longer exists"))?;

    if !user.is_active {
        return Err(unauthorized("Account is disabled"));
    }

    Ok(user)
}

/// Extractor for authenticated requests. Wraps the account row of the
/// token's subject.
///
/// ## Usage
///
/// ```rust,ignore
/// pub async fn me(user: AuthUser) -> HttpResponse {
///     HttpResponse::Ok().json(ApiResponse::success(user.0))
/// }
/// ```
pub struct AuthUser(pub UserRecord);

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(req).await.map(AuthUser) })
    }
}

/// Extractor for admin-only endpoints. Authenticates like [`AuthUser`],
/// then requires the admin role.
pub struct AdminUser(pub UserRecord);

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate(req).await?;
            if user.role != Role::Admin {
                return Err(forbidden("Admin access required"));
            }
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, 1).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, 1).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, -1).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }
}
