//! Minimart shopping cart service.
//!
//! Owns one cart per user. Product names and prices are never taken from
//! the request body: every add goes through the product service, and the
//! returned snapshot is what the cart stores. Identity comes from the
//! bearer token, verified against the auth service on every request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod items;
pub mod models;
pub mod routes;
pub mod state;
