//! Integration tests for Minimart.
//!
//! Tests here cut across service crates without requiring Postgres or a
//! running cluster: the registry is exercised through its router in-process,
//! and token / cart / order logic through the service crates' libraries.
//!
//! # Test Categories
//!
//! - `registry_api` - Registry HTTP contract (register, lookup, list)
//! - `auth_tokens` - Token issue/verify across config boundaries
//! - `cart_items` - Line-item merge and removal behavior
//! - `order_lifecycle` - Status transitions and totals
//!
//! Full end-to-end tests need the registry plus all three services and
//! their databases running; this crate stays runnable in CI without that
//! infrastructure.
