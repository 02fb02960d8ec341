//! Order status rules and server-side totals.

use minimart_core::{OrderStatus, PaymentStatus, ProductId};
use minimart_order::models::OrderItem;
use minimart_order::service::compute_total;
use rust_decimal::Decimal;

fn item(id: &str, price: &str, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        price: price.parse().expect("valid decimal"),
        image: None,
        quantity,
    }
}

#[test]
fn test_only_processing_orders_are_cancellable() {
    assert!(OrderStatus::Processing.can_cancel());
    assert!(!OrderStatus::Shipped.can_cancel());
    assert!(!OrderStatus::Delivered.can_cancel());
    assert!(!OrderStatus::Cancelled.can_cancel());
}

#[test]
fn test_total_is_sum_of_verified_line_prices() {
    let items = vec![
        item("sku-1", "19.99", 2),
        item("sku-2", "5.00", 1),
        item("sku-3", "0.01", 100),
    ];

    assert_eq!(
        compute_total(&items),
        "45.98".parse::<Decimal>().expect("decimal")
    );
}

#[test]
fn test_status_wire_format_matches_storage_format() {
    // Statuses are stored as their Display form and parsed back on read;
    // both directions must agree with the JSON representation.
    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ] {
        let stored = status.to_string();
        assert_eq!(stored.parse::<OrderStatus>().expect("parse"), status);
        assert_eq!(
            serde_json::to_value(status).expect("serialize"),
            serde_json::Value::String(stored)
        );
    }

    for status in [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ] {
        let stored = status.to_string();
        assert_eq!(stored.parse::<PaymentStatus>().expect("parse"), status);
    }
}

#[test]
fn test_order_items_survive_json_storage_roundtrip() {
    let items = vec![item("sku-1", "10.00", 1), item("sku-2", "2.50", 4)];

    let encoded = serde_json::to_string(&items).expect("encode");
    let decoded: Vec<OrderItem> = serde_json::from_str(&encoded).expect("decode");

    assert_eq!(compute_total(&decoded), compute_total(&items));
    assert_eq!(decoded[1].quantity, 4);
}
