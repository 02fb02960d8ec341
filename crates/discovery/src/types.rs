//! Wire types shared with the registry and peer services.

use minimart_core::{Email, ProductId, UserId, UserRole, Username};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A service entry as stored by (and returned from) the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Registered service name (e.g. `"product"`).
    pub name: String,
    /// Base URL the service is reachable at.
    pub url: String,
    /// Advertised endpoint paths. Informational only.
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Payload for registering a service with the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Service name to register under.
    pub name: String,
    /// Base URL peers should use.
    pub url: String,
    /// Advertised endpoint paths.
    pub endpoints: Vec<String>,
}

/// A product as returned by the product service.
///
/// This is the authoritative source for name and price; carts and orders
/// snapshot these fields rather than trusting client-supplied values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Product image URL, if any.
    #[serde(default)]
    pub image: Option<String>,
}

/// The identity resolved from a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID the token was issued for.
    pub user_id: UserId,
    /// Username at validation time.
    pub username: Username,
    /// Email at validation time.
    pub email: Email,
    /// Role at validation time.
    pub role: UserRole,
}
