//! Service discovery and inter-service HTTP clients.
//!
//! # Architecture
//!
//! Every Minimart service finds its peers through the central registry
//! service: a plain name -> base URL directory with no health checking,
//! caching, or retry policy. This crate wraps that contract in a
//! [`RegistryClient`] plus typed clients for the calls services actually
//! make to each other:
//!
//! - [`ProductClient`] - authoritative product name/price lookup (cart add,
//!   order create)
//! - [`AuthClient`] - bearer token validation (cart and order identity)
//! - [`CartClient`] - best-effort cart clear after order creation
//!
//! Clients are constructed explicitly at process start and stored in the
//! service's application state; there is no process-wide registry handle.
//! All calls are single-attempt and bounded by the underlying `reqwest`
//! client timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use minimart_discovery::{ProductClient, RegistryClient};
//!
//! let registry = RegistryClient::new("http://localhost:5000")?;
//! let products = ProductClient::new(registry.clone());
//! let product = products.fetch(&product_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod clients;
mod registry;
pub mod types;

pub use clients::{AuthClient, CartClient, ProductClient};
pub use registry::{RegistryClient, register_on_startup};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the registry or a peer service.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The registry base URL is not a valid absolute HTTP(S) URL.
    #[error("invalid registry URL: {0}")]
    InvalidRegistryUrl(String),

    /// The registry has no entry for the requested service name.
    #[error("service not registered: {0}")]
    UnknownService(String),

    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The peer answered with a non-success status.
    #[error("{service} responded with status {status}")]
    BadStatus {
        /// Service that produced the response.
        service: &'static str,
        /// HTTP status code.
        status: reqwest::StatusCode,
    },

    /// The peer's response body did not match the expected shape.
    #[error("invalid response from {service}: {message}")]
    InvalidBody {
        /// Service that produced the response.
        service: &'static str,
        /// What was wrong with the body.
        message: String,
    },
}

impl DiscoveryError {
    /// Whether this error means the requested entity does not exist, as
    /// opposed to the peer being unreachable or broken.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownService(_)
                | Self::BadStatus {
                    status: reqwest::StatusCode::NOT_FOUND,
                    ..
                }
        )
    }
}
