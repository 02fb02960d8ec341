//! HTTP route handlers for the order service.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                        - Liveness check
//! GET   /health/ready                  - Readiness check (verifies database)
//!
//! GET   /api/orders                    - Caller's orders, newest first
//! GET   /api/orders/{id}               - One order, scoped to the caller
//! POST  /api/orders                    - Place an order
//! PATCH /api/orders/{id}/status        - Set fulfilment status
//! PATCH /api/orders/{id}/payment       - Set payment status
//! PATCH /api/orders/{id}/cancel        - Cancel while still Processing
//! ```
//!
//! All routes require a bearer token; every order read or written belongs
//! to the token owner.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{OrderId, OrderStatus, PaymentStatus};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::Identity;
use crate::models::{Order, ShippingAddress};
use crate::service::{self, RequestedItem};
use crate::state::AppState;

/// Body for placing an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<RequestedItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// Body for setting the fulfilment status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub order_status: OrderStatus,
}

/// Body for setting the payment status.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
}

/// Create all routes for the order service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/orders", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/payment", patch(update_payment))
        .route("/{id}/cancel", patch(cancel_order))
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

/// The caller's orders, newest first.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn list_orders(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_by_user(identity.user.user_id).await?;
    Ok(Json(orders))
}

/// One order, scoped to the caller.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn get_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_for_user(id, identity.user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
    Ok(Json(order))
}

/// Place an order.
///
/// Every product is re-verified against the product service and the total
/// is computed from verified prices before anything is persisted. After a
/// successful insert the caller's cart is cleared through the cart
/// service; a failed clear is logged and does not fail the order.
#[instrument(skip(state, identity, request), fields(user_id = %identity.user.user_id))]
async fn create_order(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let verified = service::verify_items(state.products(), &request.items).await?;

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .create(
            identity.user.user_id,
            &verified.items,
            verified.total_amount,
            &request.shipping_address,
            &request.payment_method,
        )
        .await?;

    tracing::info!(order_id = %order.id, total = %order.total_amount, "order placed");

    if let Err(error) = state.carts().clear(&identity.bearer).await {
        tracing::warn!(order_id = %order.id, %error, "cart clear after order failed");
    }

    Ok((StatusCode::CREATED, Json(order)))
}

/// Set the fulfilment status of an order.
#[instrument(skip(state, identity, request), fields(user_id = %identity.user.user_id))]
async fn update_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .set_status(id, identity.user.user_id, request.order_status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
    Ok(Json(order))
}

/// Set the payment status of an order.
#[instrument(skip(state, identity, request), fields(user_id = %identity.user.user_id))]
async fn update_payment(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .set_payment_status(id, identity.user.user_id, request.payment_status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
    Ok(Json(order))
}

/// Cancel an order while it is still Processing.
///
/// The check-and-set is a single conditional update; an order that has
/// already shipped (or was already cancelled) yields 409 and its status is
/// left untouched.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn cancel_order(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());

    if let Some(order) = repo.cancel(id, identity.user.user_id).await? {
        tracing::info!(order_id = %order.id, "order cancelled");
        return Ok(Json(order));
    }

    // The conditional update matched nothing: either the order doesn't
    // exist for this caller, or it is past Processing.
    let current = repo
        .get_for_user(id, identity.user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Err(AppError::Conflict(format!(
        "order {id} cannot be cancelled while {}",
        current.order_status
    )))
}
