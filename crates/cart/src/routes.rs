//! HTTP route handlers for the cart service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness check (verifies database)
//!
//! POST /api/cart/get                       - Get or create the caller's cart
//! POST /api/cart/items                     - Add a product to the cart
//! PUT  /api/cart/items/{item_id}           - Set a line's quantity
//! POST /api/cart/items/{item_id}/remove    - Remove a line
//! POST /api/cart/clear                     - Empty the cart
//! ```
//!
//! All `/api/cart` routes require a bearer token; the cart acted on is
//! always the token owner's.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::{LineItemId, ProductId};

use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::extract::Identity;
use crate::items;
use crate::models::Cart;
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for setting a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: u32,
}

/// Create all routes for the cart service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/cart", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/get", post(get_or_create_cart))
        .route("/items", post(add_item))
        .route("/items/{item_id}", put(update_item))
        .route("/items/{item_id}/remove", post(remove_item))
        .route("/clear", post(clear_cart))
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

/// Return the caller's cart, creating an empty one on first touch.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn get_or_create_cart(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Cart>> {
    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(identity.user.user_id).await?;
    Ok(Json(cart))
}

/// Add a product to the caller's cart.
///
/// Name and price are fetched from the product service; the request body
/// only says which product and how many. Adding a product already in the
/// cart increments that line's quantity.
#[instrument(skip(state, identity, request), fields(user_id = %identity.user.user_id))]
async fn add_item(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<Cart>)> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_owned()));
    }

    let product = state
        .products()
        .fetch(&request.product_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound(format!("product not found: {}", request.product_id))
            } else {
                AppError::Downstream(e)
            }
        })?;

    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(identity.user.user_id).await?;

    let mut updated_items = cart.items.clone();
    items::add(&mut updated_items, &product, request.quantity);

    let cart = repo
        .update_items(cart.id, cart.version, &updated_items)
        .await?;

    tracing::info!(cart_id = %cart.id, product_id = %product.id, "item added to cart");

    Ok((StatusCode::CREATED, Json(cart)))
}

/// Set the quantity of one line in the caller's cart.
#[instrument(skip(state, identity, request), fields(user_id = %identity.user.user_id))]
async fn update_item(
    State(state): State<AppState>,
    identity: Identity,
    Path(item_id): Path<LineItemId>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Cart>> {
    if request.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1; remove the item instead".to_owned(),
        ));
    }

    let repo = CartRepository::new(state.pool());
    let cart = repo
        .get_by_user(identity.user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    let mut updated_items = cart.items.clone();
    if !items::update_quantity(&mut updated_items, item_id, request.quantity) {
        return Err(AppError::NotFound(format!("item {item_id} not in cart")));
    }

    let cart = repo
        .update_items(cart.id, cart.version, &updated_items)
        .await?;

    Ok(Json(cart))
}

/// Remove one line from the caller's cart.
///
/// Removing a line that is not in the cart is a no-op, not an error.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn remove_item(
    State(state): State<AppState>,
    identity: Identity,
    Path(item_id): Path<LineItemId>,
) -> Result<Json<Cart>> {
    let repo = CartRepository::new(state.pool());
    let cart = repo
        .get_by_user(identity.user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    let mut updated_items = cart.items.clone();
    if !items::remove(&mut updated_items, item_id) {
        return Ok(Json(cart));
    }

    let cart = repo
        .update_items(cart.id, cart.version, &updated_items)
        .await?;

    Ok(Json(cart))
}

/// Empty the caller's cart.
///
/// Called by the order service after an order is placed, and by clients
/// directly. A user with no cart gets a 404, which callers may treat as
/// already cleared.
#[instrument(skip(state, identity), fields(user_id = %identity.user.user_id))]
async fn clear_cart(State(state): State<AppState>, identity: Identity) -> Result<Json<Cart>> {
    let repo = CartRepository::new(state.pool());
    let cart = repo
        .get_by_user(identity.user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart not found".to_owned()))?;

    let cart = repo.update_items(cart.id, cart.version, &[]).await?;

    tracing::info!(cart_id = %cart.id, "cart cleared");

    Ok(Json(cart))
}
