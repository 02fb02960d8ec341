//! Client for the central service registry.

use std::time::Duration;

use url::Url;

use crate::types::{Registration, ServiceInfo};
use crate::DiscoveryError;

/// Default timeout applied to every registry and peer-service call.
///
/// There is deliberately no retry on top of this; a slow downstream fails
/// the calling request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the registry's `POST /register` / `GET /service/{name}`
/// contract.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
/// Construct one at process start and hand it to the application state.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client for the registry at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidRegistryUrl`] if `base_url` is not
    /// an absolute URL, or [`DiscoveryError::Unreachable`] if the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, DiscoveryError> {
        // Validate early so a bad REGISTRY_URL fails at startup, not on the
        // first lookup.
        let parsed = Url::parse(base_url)
            .map_err(|e| DiscoveryError::InvalidRegistryUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DiscoveryError::InvalidRegistryUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Look up the service registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownService`] if the registry has no
    /// entry, [`DiscoveryError::Unreachable`] on transport failure, and
    /// [`DiscoveryError::BadStatus`] for any other non-success response.
    pub async fn lookup(&self, name: &str) -> Result<ServiceInfo, DiscoveryError> {
        let response = self
            .http
            .get(format!("{}/service/{name}", self.base_url))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DiscoveryError::UnknownService(name.to_owned()));
        }

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus {
                service: "registry",
                status: response.status(),
            });
        }

        let info = response
            .json::<ServiceInfo>()
            .await
            .map_err(|e| DiscoveryError::InvalidBody {
                service: "registry",
                message: e.to_string(),
            })?;

        Ok(info)
    }

    /// Register a service with the registry.
    ///
    /// Registration is an upsert: re-registering the same name replaces the
    /// stored URL and endpoint list.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Unreachable`] on transport failure and
    /// [`DiscoveryError::BadStatus`] for a non-success response.
    pub async fn register(&self, registration: &Registration) -> Result<ServiceInfo, DiscoveryError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(registration)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::BadStatus {
                service: "registry",
                status: response.status(),
            });
        }

        let info = response
            .json::<ServiceInfo>()
            .await
            .map_err(|e| DiscoveryError::InvalidBody {
                service: "registry",
                message: e.to_string(),
            })?;

        Ok(info)
    }

    /// The HTTP client shared with the typed peer-service clients.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Register with the registry at startup, logging instead of failing.
///
/// Registry downtime must not keep a service from booting; peers will fail
/// lookups until the registry is back and the service re-registers on its
/// next restart.
pub async fn register_on_startup(client: &RegistryClient, registration: &Registration) {
    match client.register(registration).await {
        Ok(info) => {
            tracing::info!(service = %info.name, url = %info.url, "registered with service registry");
        }
        Err(error) => {
            tracing::warn!(service = %registration.name, %error, "service registry registration failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_http_urls() {
        assert!(matches!(
            RegistryClient::new("localhost:5000"),
            Err(DiscoveryError::InvalidRegistryUrl(_))
        ));
        assert!(matches!(
            RegistryClient::new("not a url"),
            Err(DiscoveryError::InvalidRegistryUrl(_))
        ));
        assert!(RegistryClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_new_normalizes_trailing_slash() {
        let client = RegistryClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
