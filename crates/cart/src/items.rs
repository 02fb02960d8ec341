//! Pure line-item mutations, separated from storage so they can be tested
//! without a database.

use minimart_core::{LineItemId, ProductId};
use minimart_discovery::Product;

use crate::models::CartItem;

/// Add `quantity` units of `product` to `items`.
///
/// If the product is already in the cart its quantity is incremented and the
/// existing line keeps its ID and price snapshot. Otherwise a new line is
/// appended with a fresh [`LineItemId`].
///
/// Returns the ID of the affected line.
pub fn add(items: &mut Vec<CartItem>, product: &Product, quantity: u32) -> LineItemId {
    if let Some(existing) = items.iter_mut().find(|i| i.product_id == product.id) {
        existing.quantity = existing.quantity.saturating_add(quantity);
        return existing.id;
    }

    let line = CartItem {
        id: LineItemId::generate(),
        product_id: product.id.clone(),
        name: product.name.clone(),
        price: product.price,
        image: product.image.clone(),
        quantity,
    };
    let id = line.id;
    items.push(line);
    id
}

/// Set the quantity of the line identified by `item_id`.
///
/// Returns `false` if no such line exists.
pub fn update_quantity(items: &mut [CartItem], item_id: LineItemId, quantity: u32) -> bool {
    match items.iter_mut().find(|i| i.id == item_id) {
        Some(line) => {
            line.quantity = quantity;
            true
        }
        None => false,
    }
}

/// Remove the line identified by `item_id`.
///
/// Returns `false` if no such line exists.
pub fn remove(items: &mut Vec<CartItem>, item_id: LineItemId) -> bool {
    let before = items.len();
    items.retain(|i| i.id != item_id);
    items.len() < before
}

/// Find the line for `product_id`, if any.
#[must_use]
pub fn find_by_product<'a>(items: &'a [CartItem], product_id: &ProductId) -> Option<&'a CartItem> {
    items.iter().find(|i| &i.product_id == product_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: price.parse().unwrap(),
            image: None,
        }
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut items = Vec::new();
        let line_id = add(&mut items, &product("p1", "9.99"), 2);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, line_id);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, Decimal::new(999, 2));
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut items = Vec::new();
        let first = add(&mut items, &product("p1", "9.99"), 2);
        let second = add(&mut items, &product("p1", "9.99"), 3);

        assert_eq!(first, second);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut items = Vec::new();
        add(&mut items, &product("p1", "9.99"), 1);
        // Product service now reports a new price; the existing line keeps
        // the price it was added at.
        add(&mut items, &product("p1", "14.99"), 1);

        assert_eq!(items[0].price, Decimal::new(999, 2));
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_add_different_products_appends() {
        let mut items = Vec::new();
        add(&mut items, &product("p1", "1.00"), 1);
        add(&mut items, &product("p2", "2.00"), 1);

        assert_eq!(items.len(), 2);
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn test_update_quantity() {
        let mut items = Vec::new();
        let line_id = add(&mut items, &product("p1", "1.00"), 1);

        assert!(update_quantity(&mut items, line_id, 7));
        assert_eq!(items[0].quantity, 7);

        assert!(!update_quantity(&mut items, LineItemId::generate(), 7));
    }

    #[test]
    fn test_remove_leaves_other_lines() {
        let mut items = Vec::new();
        let first = add(&mut items, &product("p1", "1.00"), 1);
        add(&mut items, &product("p2", "2.00"), 1);

        assert!(remove(&mut items, first));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, ProductId::new("p2"));

        assert!(!remove(&mut items, first));
    }

    #[test]
    fn test_find_by_product() {
        let mut items = Vec::new();
        add(&mut items, &product("p1", "1.00"), 1);

        assert!(find_by_product(&items, &ProductId::new("p1")).is_some());
        assert!(find_by_product(&items, &ProductId::new("p9")).is_none());
    }
}
