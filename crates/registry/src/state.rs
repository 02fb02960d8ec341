//! In-memory registry state shared across handlers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One registered service entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Registered service name (e.g. `"auth"`).
    pub name: String,
    /// Base URL the service is reachable at.
    pub url: String,
    /// Advertised endpoint paths. Informational only.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// When the service (last) registered.
    pub registered_at: DateTime<Utc>,
}

/// Registry state: a name -> entry map behind a lock.
///
/// Cheaply cloneable; the map is shared via `Arc`. All contents are lost on
/// restart - services re-register when they boot.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    services: Arc<RwLock<HashMap<String, ServiceEntry>>>,
}

impl AppState {
    /// Create empty registry state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `entry.name`. Last registration wins.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned, which only happens if another handler
    /// already panicked while holding it.
    pub fn upsert(&self, entry: ServiceEntry) -> ServiceEntry {
        let mut services = self.services.write().expect("registry lock poisoned");
        services.insert(entry.name.clone(), entry.clone());
        entry
    }

    /// Look up a service by name.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ServiceEntry> {
        let services = self.services.read().expect("registry lock poisoned");
        services.get(name).cloned()
    }

    /// All registered entries, sorted by name.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<ServiceEntry> {
        let services = self.services.read().expect("registry lock poisoned");
        let mut entries: Vec<ServiceEntry> = services.values().cloned().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(name: &str, url: &str) -> ServiceEntry {
        ServiceEntry {
            name: name.to_owned(),
            url: url.to_owned(),
            endpoints: Vec::new(),
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_get_missing_returns_none() {
        let state = AppState::new();
        assert!(state.get("auth").is_none());
    }

    #[test]
    fn test_upsert_then_get() {
        let state = AppState::new();
        state.upsert(entry("auth", "http://localhost:5001"));

        let found = state.get("auth").unwrap();
        assert_eq!(found.url, "http://localhost:5001");
    }

    #[test]
    fn test_reregistration_replaces_entry() {
        let state = AppState::new();
        state.upsert(entry("cart", "http://localhost:5002"));
        state.upsert(entry("cart", "http://10.0.0.2:5002"));

        assert_eq!(state.get("cart").unwrap().url, "http://10.0.0.2:5002");
        assert_eq!(state.list().len(), 1);
    }

    #[test]
    fn test_list_is_sorted_by_name() {
        let state = AppState::new();
        state.upsert(entry("order", "http://localhost:5003"));
        state.upsert(entry("auth", "http://localhost:5001"));

        let names: Vec<String> = state.list().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["auth", "order"]);
    }
}
