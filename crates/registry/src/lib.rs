//! Minimart service registry.
//!
//! A name -> base URL directory for the backend services. Services POST
//! their name, URL, and endpoint list at startup; peers resolve each other
//! with a GET per request. The directory lives in process memory only:
//! there is no health checking, no TTL or expiry, and registrations do not
//! survive a restart - services are expected to re-register when they boot.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
