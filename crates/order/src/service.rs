//! Order creation logic: validation, product verification, and totals.
//!
//! Client-supplied items are never trusted for pricing. Every product in
//! the request is re-fetched from the product service and the snapshot
//! (name, price, image) comes from that response; the requested quantity
//! is the only client-controlled field that survives.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use minimart_core::ProductId;
use minimart_discovery::{DiscoveryError, ProductClient};

use crate::models::OrderItem;

/// One requested line in an order creation request.
#[derive(Debug, Deserialize)]
pub struct RequestedItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A verified, priced item list ready to persist.
#[derive(Debug)]
pub struct VerifiedOrder {
    /// Snapshot lines with verified names and prices.
    pub items: Vec<OrderItem>,
    /// Sum of line totals from verified prices.
    pub total_amount: Decimal,
}

/// Errors from order creation.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The item list was empty.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A line had quantity zero.
    #[error("invalid quantity for product {0}: must be at least 1")]
    InvalidQuantity(ProductId),

    /// A product in the list does not exist.
    #[error("invalid product: {0}")]
    InvalidProduct(ProductId),

    /// The product service could not be reached.
    #[error("product verification failed: {0}")]
    Downstream(#[from] DiscoveryError),
}

/// Verify every requested item against the product service and compute the
/// order total.
///
/// Fails before touching any storage: an order with an empty list, a zero
/// quantity, or an unknown product is rejected with nothing persisted.
///
/// # Errors
///
/// Returns [`OrderError::EmptyOrder`], [`OrderError::InvalidQuantity`], or
/// [`OrderError::InvalidProduct`] for bad input, and
/// [`OrderError::Downstream`] when the product service is unreachable.
pub async fn verify_items(
    products: &ProductClient,
    requested: &[RequestedItem],
) -> Result<VerifiedOrder, OrderError> {
    if requested.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    if let Some(bad) = requested.iter().find(|item| item.quantity == 0) {
        return Err(OrderError::InvalidQuantity(bad.product_id.clone()));
    }

    let mut items = Vec::with_capacity(requested.len());
    for line in requested {
        let product = products.fetch(&line.product_id).await.map_err(|e| {
            if e.is_not_found() {
                OrderError::InvalidProduct(line.product_id.clone())
            } else {
                OrderError::Downstream(e)
            }
        })?;

        items.push(OrderItem {
            product_id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: line.quantity,
        });
    }

    let total_amount = compute_total(&items);

    Ok(VerifiedOrder {
        items,
        total_amount,
    })
}

/// Sum of line totals.
#[must_use]
pub fn compute_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(price: &str, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new("p"),
            name: "Product".to_owned(),
            price: price.parse().unwrap(),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_compute_total() {
        let items = vec![item("19.99", 2), item("0.01", 5)];
        assert_eq!(compute_total(&items), "40.03".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_compute_total_empty_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    fn products_client() -> ProductClient {
        // Never contacted by the rejection paths below.
        let registry = minimart_discovery::RegistryClient::new("http://localhost:5000")
            .expect("valid url");
        ProductClient::new(registry)
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected_before_any_lookup() {
        let result = verify_items(&products_client(), &[]).await;
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_before_any_lookup() {
        let requested = vec![RequestedItem {
            product_id: ProductId::new("p1"),
            quantity: 0,
        }];
        let result = verify_items(&products_client(), &requested).await;
        assert!(matches!(result, Err(OrderError::InvalidQuantity(_))));
    }
}
