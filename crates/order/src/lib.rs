//! Minimart order service.
//!
//! Owns the order collection. Orders are created from a client-supplied
//! item list, but every product is re-verified against the product service
//! and the total is computed server-side from verified prices. After a
//! successful creation the caller's cart is cleared best-effort through
//! the cart service.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
