//! Cart and line item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minimart_core::{CartId, LineItemId, ProductId, UserId};

/// One line in a cart.
///
/// `name`, `price`, and `image` are snapshots taken from the product
/// service at the moment the line was added; they are not refreshed if the
/// product changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Stable line item ID, assigned when the line is first created.
    pub id: LineItemId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Decimal,
    /// Product image URL at add time, if any.
    #[serde(default)]
    pub image: Option<String>,
    /// Number of units. Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A user's cart.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Database ID.
    pub id: CartId,
    /// Owning user. Exactly one cart per user.
    pub user_id: UserId,
    /// Line items, oldest first.
    pub items: Vec<CartItem>,
    /// Concurrency stamp, bumped on every item mutation.
    pub version: i32,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product: &str, price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: LineItemId::generate(),
            product_id: ProductId::new(product),
            name: product.to_owned(),
            price: price.parse().unwrap(),
            image: None,
            quantity,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("p1", "19.99", 3).line_total(), "59.97".parse().unwrap());
    }

    #[test]
    fn test_cart_total_sums_lines() {
        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            items: vec![item("p1", "10.00", 2), item("p2", "0.50", 1)],
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(cart.total(), "20.50".parse().unwrap());
    }
}
