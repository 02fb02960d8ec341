//! Line-item merge and removal behavior shared by cart flows.

use minimart_cart::items;
use minimart_cart::models::CartItem;
use minimart_core::ProductId;
use minimart_discovery::Product;
use rust_decimal::Decimal;

fn product(id: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: price.parse().expect("valid decimal"),
        image: Some(format!("https://img.example/{id}.png")),
    }
}

#[test]
fn test_adding_same_product_twice_merges_into_one_line() {
    let mut cart_items: Vec<CartItem> = Vec::new();

    items::add(&mut cart_items, &product("sku-1", "9.99"), 1);
    items::add(&mut cart_items, &product("sku-1", "9.99"), 2);

    assert_eq!(cart_items.len(), 1);
    assert_eq!(cart_items[0].quantity, 3);
}

#[test]
fn test_removing_one_of_n_items_leaves_the_rest() {
    let mut cart_items: Vec<CartItem> = Vec::new();
    let ids: Vec<_> = (0..5)
        .map(|n| items::add(&mut cart_items, &product(&format!("sku-{n}"), "1.00"), 1))
        .collect();

    assert!(items::remove(&mut cart_items, ids[2]));

    assert_eq!(cart_items.len(), 4);
    for (index, id) in ids.iter().enumerate() {
        let present = cart_items.iter().any(|item| item.id == *id);
        assert_eq!(present, index != 2, "line {index} presence");
    }
}

#[test]
fn test_snapshot_fields_come_from_the_product_service() {
    let mut cart_items: Vec<CartItem> = Vec::new();
    items::add(&mut cart_items, &product("sku-9", "42.00"), 1);

    let line = &cart_items[0];
    assert_eq!(line.name, "Product sku-9");
    assert_eq!(line.price, "42.00".parse::<Decimal>().expect("decimal"));
    assert_eq!(line.image.as_deref(), Some("https://img.example/sku-9.png"));
}

#[test]
fn test_line_items_survive_json_storage_roundtrip() {
    let mut cart_items: Vec<CartItem> = Vec::new();
    items::add(&mut cart_items, &product("sku-1", "19.95"), 2);
    items::add(&mut cart_items, &product("sku-2", "0.05"), 1);

    // Carts persist items as a JSONB array; the decoded form must be
    // byte-for-byte usable by the same merge logic.
    let encoded = serde_json::to_string(&cart_items).expect("encode");
    let mut decoded: Vec<CartItem> = serde_json::from_str(&encoded).expect("decode");

    items::add(&mut decoded, &product("sku-1", "19.95"), 1);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].quantity, 3);
    assert_eq!(decoded[0].id, cart_items[0].id);
}
