//! Typed clients for the peer-service calls Minimart services make.
//!
//! Each client resolves its peer through the registry on every call - the
//! registry keeps no TTLs and peers may re-register with a new URL at any
//! time, so nothing is cached here.

use minimart_core::ProductId;
use serde::Deserialize;

use crate::types::{AuthenticatedUser, Product};
use crate::{DiscoveryError, RegistryClient};

/// Client for the product service's read API.
#[derive(Debug, Clone)]
pub struct ProductClient {
    registry: RegistryClient,
}

impl ProductClient {
    /// Create a product client resolving through `registry`.
    #[must_use]
    pub const fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    /// Fetch the authoritative record for one product.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownService`] if no product service is
    /// registered, a 404 [`DiscoveryError::BadStatus`] if the product does
    /// not exist, and [`DiscoveryError::Unreachable`] on transport failure.
    pub async fn fetch(&self, product_id: &ProductId) -> Result<Product, DiscoveryError> {
        let service = self.registry.lookup("product").await?;

        let response = self
            .registry
            .http()
            .get(format!(
                "{}/api/products/{product_id}",
                service.url.trim_end_matches('/')
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus {
                service: "product",
                status: response.status(),
            });
        }

        response
            .json::<Product>()
            .await
            .map_err(|e| DiscoveryError::InvalidBody {
                service: "product",
                message: e.to_string(),
            })
    }
}

/// Shape of the auth service's validate-token response.
#[derive(Debug, Deserialize)]
struct ValidateTokenResponse {
    valid: bool,
    #[serde(flatten)]
    user: AuthenticatedUser,
}

/// Client for the auth service's token validation endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    registry: RegistryClient,
}

impl AuthClient {
    /// Create an auth client resolving through `registry`.
    #[must_use]
    pub const fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    /// Validate a bearer token and resolve the identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns a 401 [`DiscoveryError::BadStatus`] for a missing, expired,
    /// or tampered token, [`DiscoveryError::UnknownService`] if no auth
    /// service is registered, and [`DiscoveryError::Unreachable`] on
    /// transport failure.
    pub async fn validate(&self, bearer_token: &str) -> Result<AuthenticatedUser, DiscoveryError> {
        let service = self.registry.lookup("auth").await?;

        let response = self
            .registry
            .http()
            .get(format!(
                "{}/api/auth/validate-token",
                service.url.trim_end_matches('/')
            ))
            .bearer_auth(bearer_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus {
                service: "auth",
                status: response.status(),
            });
        }

        let body = response
            .json::<ValidateTokenResponse>()
            .await
            .map_err(|e| DiscoveryError::InvalidBody {
                service: "auth",
                message: e.to_string(),
            })?;

        if !body.valid {
            return Err(DiscoveryError::InvalidBody {
                service: "auth",
                message: "token reported invalid with success status".to_owned(),
            });
        }

        Ok(body.user)
    }
}

/// Client for the cart service's clear endpoint.
#[derive(Debug, Clone)]
pub struct CartClient {
    registry: RegistryClient,
}

impl CartClient {
    /// Create a cart client resolving through `registry`.
    #[must_use]
    pub const fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    /// Clear the cart belonging to the identity behind `bearer_token`.
    ///
    /// A user with no cart is treated as already cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownService`] if no cart service is
    /// registered, [`DiscoveryError::Unreachable`] on transport failure,
    /// and [`DiscoveryError::BadStatus`] for other non-success responses.
    pub async fn clear(&self, bearer_token: &str) -> Result<(), DiscoveryError> {
        let service = self.registry.lookup("cart").await?;

        let response = self
            .registry
            .http()
            .post(format!(
                "{}/api/cart/clear",
                service.url.trim_end_matches('/')
            ))
            .bearer_auth(bearer_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus {
                service: "cart",
                status: response.status(),
            });
        }

        Ok(())
    }
}
