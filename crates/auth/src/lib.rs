//! Minimart authentication service.
//!
//! Owns the user collection and issues the HS256 bearer tokens every other
//! service trusts. Peers validate tokens by calling `validate-token` here
//! through the service registry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod token;
