//! HTTP route handlers for the auth service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (verifies database)
//!
//! POST /api/auth/register        - Create account, returns token + user
//! POST /api/auth/login           - Verify credentials, returns token + user
//! GET  /api/auth/validate-token  - Verify a bearer token (peer services)
//! GET  /api/auth/user            - Current user profile (bearer)
//! GET  /api/auth/users/{id}      - Public profile by id (peer services)
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{UserId, UserRole};

use crate::error::{AppError, Result};
use crate::models::User;
use crate::service::AuthService;
use crate::state::AppState;
use crate::token;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `user` when omitted.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login: a fresh token plus the user it belongs to.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Response for validate-token, consumed by peer services.
#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

/// Create all routes for the auth service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/auth", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/validate-token", get(validate_token))
        .route("/user", get(current_user))
        .route("/users/{id}", get(user_by_id))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Register a new user and issue their first token.
#[instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let service = AuthService::new(state.pool());
    let user = service
        .register(
            &request.username,
            &request.email,
            &request.password,
            request.role,
        )
        .await?;

    let token = token::issue(user.id, state.config()).map_err(AppError::Auth)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_owned(),
            token,
            user,
        }),
    ))
}

/// Verify credentials and issue a token.
#[instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let service = AuthService::new(state.pool());
    let user = service.login(&request.email, &request.password).await?;

    let token = token::issue(user.id, state.config()).map_err(AppError::Auth)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_owned(),
        token,
        user,
    }))
}

/// Verify a bearer token and resolve the user it was issued for.
///
/// A token whose subject no longer exists is treated the same as an invalid
/// token: peers must not grant access on its basis.
async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidateTokenResponse>> {
    let user = authenticated_user(&state, &headers).await?;

    Ok(Json(ValidateTokenResponse {
        valid: true,
        user_id: user.id,
        username: user.username.into_inner(),
        email: user.email.into_inner(),
        role: user.role,
    }))
}

/// Current user profile for the presented token.
async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<User>> {
    let user = authenticated_user(&state, &headers).await?;
    Ok(Json(user))
}

/// Public profile lookup by id, used by peer services.
async fn user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>> {
    let service = AuthService::new(state.pool());
    let user = service
        .get_user(UserId::new(id))
        .await
        .map_err(|e| match e {
            crate::service::AuthError::UserNotFound => {
                AppError::NotFound(format!("user {id}"))
            }
            other => AppError::Auth(other),
        })?;

    Ok(Json(user))
}

/// Decode the bearer token from `headers` and load its user.
async fn authenticated_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = bearer_token(headers)?;
    let claims = token::decode(token, state.config()).map_err(AppError::Auth)?;
    let user_id = claims.user_id().map_err(AppError::Auth)?;

    let service = AuthService::new(state.pool());
    service.get_user(user_id).await.map_err(|e| match e {
        crate::service::AuthError::UserNotFound => {
            AppError::Unauthorized("token subject no longer exists".to_owned())
        }
        other => AppError::Auth(other),
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_owned()))?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_value() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }
}
