//! Identity extraction from the `Authorization` header.
//!
//! Identity is never taken from the request body. The bearer token is
//! validated against the auth service on every request, so a revoked or
//! expired token stops working immediately.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};

use minimart_discovery::{AuthenticatedUser, DiscoveryError};

use crate::error::AppError;
use crate::state::AppState;

/// The verified identity behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Identity as resolved by the auth service.
    pub user: AuthenticatedUser,
    /// The raw bearer token, for forwarding to peers.
    pub bearer: String,
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = bearer_token(parts)?.to_owned();

        let user = state.auth().validate(&bearer).await.map_err(|e| match e {
            DiscoveryError::BadStatus {
                service: "auth",
                status,
            } if status == StatusCode::UNAUTHORIZED => {
                AppError::Unauthorized("Invalid or expired token".to_owned())
            }
            other => AppError::Downstream(other),
        })?;

        Ok(Self { user, bearer })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_owned()))?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_owned()))
}
