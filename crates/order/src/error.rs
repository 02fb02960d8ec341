//! Unified error handling for the order service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use minimart_discovery::DiscoveryError;

use crate::db::RepositoryError;
use crate::service::OrderError;

/// JSON error body returned to callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type for the order service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order creation failed validation or verification.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A peer service could not be reached or answered badly.
    #[error("Downstream error: {0}")]
    Downstream(#[from] DiscoveryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested transition is not allowed in the order's current state.
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(err) => match err {
                OrderError::EmptyOrder
                | OrderError::InvalidQuantity(_)
                | OrderError::InvalidProduct(_) => StatusCode::BAD_REQUEST,
                OrderError::Downstream(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Downstream(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Downstream(_) | Self::Order(OrderError::Downstream(_)) => {
                "A required service is unavailable".to_string()
            }
            Self::Order(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl AppError {
    /// Whether this error is our fault rather than the caller's.
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Downstream(_) | Self::Order(OrderError::Downstream(_))
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use minimart_core::ProductId;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Order(OrderError::EmptyOrder)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::InvalidProduct(ProductId::new(
                "ghost"
            )))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Conflict("already shipped".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Downstream(DiscoveryError::UnknownService(
                "cart".into()
            ))),
            StatusCode::BAD_GATEWAY
        );
    }
}
