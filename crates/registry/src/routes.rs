//! HTTP route handlers for the registry.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! POST /register        - Register (or re-register) a service
//! GET  /service/{name}  - Look up one service
//! GET  /services        - List all registered services
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use url::Url;

use crate::error::AppError;
use crate::state::{AppState, ServiceEntry};

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Create all routes for the registry.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/service/{name}", get(lookup))
        .route("/services", get(list))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Register a service. Re-registering a name replaces the stored entry.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ServiceEntry>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Service name is required".to_owned()));
    }

    let url = Url::parse(&request.url)
        .map_err(|e| AppError::BadRequest(format!("Invalid service URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::BadRequest(format!(
            "Invalid service URL: unsupported scheme {}",
            url.scheme()
        )));
    }

    let entry = state.upsert(ServiceEntry {
        name: request.name,
        url: request.url,
        endpoints: request.endpoints,
        registered_at: Utc::now(),
    });

    tracing::info!(service = %entry.name, url = %entry.url, "service registered");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Look up one service by name.
async fn lookup(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceEntry>, AppError> {
    state
        .get(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("service {name}")))
}

/// List all registered services.
async fn list(State(state): State<AppState>) -> Json<Vec<ServiceEntry>> {
    Json(state.list())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        routes().with_state(AppState::new())
    }

    fn register_body(name: &str, url: &str) -> Body {
        Body::from(
            serde_json::json!({
                "name": name,
                "url": url,
                "endpoints": ["/api/test"],
            })
            .to_string(),
        )
    }

    fn post_register(name: &str, url: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(register_body(name, url))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_then_lookup() {
        let state = AppState::new();
        let app = routes().with_state(state);

        let response = app
            .clone()
            .oneshot(post_register("auth", "http://localhost:5001"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/service/auth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let entry: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry["name"], "auth");
        assert_eq!(entry["url"], "http://localhost:5001");
    }

    #[tokio::test]
    async fn test_lookup_unknown_service_is_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/service/payments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_name() {
        let response = app()
            .oneshot(post_register("  ", "http://localhost:5001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_url() {
        let response = app()
            .oneshot(post_register("auth", "localhost:5001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reregistration_updates_url() {
        let state = AppState::new();
        let app = routes().with_state(state);

        app.clone()
            .oneshot(post_register("cart", "http://localhost:5002"))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_register("cart", "http://10.0.0.9:5002"))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/service/cart")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let entry: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry["url"], "http://10.0.0.9:5002");
    }
}
