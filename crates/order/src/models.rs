//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minimart_core::{OrderId, OrderStatus, PaymentStatus, ProductId, UserId};

/// One line in an order's immutable item snapshot.
///
/// Unlike cart lines these have no separate line ID: the snapshot is never
/// edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Verified unit price at order time.
    pub price: Decimal,
    /// Product image URL at order time, if any.
    #[serde(default)]
    pub image: Option<String>,
    /// Number of units. Always at least 1.
    pub quantity: u32,
}

impl OrderItem {
    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shipping address, stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Database ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Item snapshot, copied at creation and immutable afterwards.
    pub items: Vec<OrderItem>,
    /// Sum of line totals, computed server-side from verified prices.
    pub total_amount: Decimal,
    /// Where to ship.
    pub shipping_address: ShippingAddress,
    /// Free-form payment method label (e.g. `"card"`).
    pub payment_method: String,
    /// Fulfilment status.
    pub order_status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last modified.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: ProductId::new("p1"),
            name: "Widget".to_owned(),
            price: "2.50".parse().unwrap(),
            image: None,
            quantity: 4,
        };
        assert_eq!(item.line_total(), "10.00".parse().unwrap());
    }
}
