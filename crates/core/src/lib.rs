//! Minimart Core - Shared types library.
//!
//! This crate provides common types used across all Minimart services:
//! - `registry` - Service registry (name -> URL directory)
//! - `auth` - Authentication service
//! - `cart` - Shopping cart service
//! - `order` - Order management service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, usernames, and
//!   lifecycle statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
