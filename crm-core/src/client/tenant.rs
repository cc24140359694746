//! Tenant context provider for interactive consumers.
//!
//! Holds the tenant record an interactive session is working against and
//! publishes its lifecycle over a watch channel:
//! `uninitialized → loading → {loaded | error}`, with `loaded → loading`
//! again on an explicit tenant switch.
//!
//! Consumers receive the provider (or a subscription) by construction;
//! there is no ambient registry to look it up from, so "used outside the
//! provider" is a compile error rather than a runtime panic.

use std::sync::RwLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Configuration for the tenant provider.
#[derive(Clone, Debug)]
pub struct TenantProviderConfig {
    /// Base URL of the CRM API (e.g. "http://localhost:8080").
    pub base_url: String,
    /// Request timeout for the tenant fetch.
    pub request_timeout: Duration,
}

impl Default for TenantProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// The tenant record as served by `GET /api/tenant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSnapshot {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: String,
}

/// Provider lifecycle states.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantState {
    Uninitialized,
    Loading,
    Loaded(TenantSnapshot),
    Error(String),
}

/// Client-side holder of the current tenant.
pub struct TenantProvider {
    http: reqwest::Client,
    base_url: String,
    tenant_id: RwLock<Option<String>>,
    state_tx: watch::Sender<TenantState>,
}

impl TenantProvider {
    /// Create a provider with no tenant loaded yet. Callers pin a tenant
    /// with [`TenantProvider::set_tenant`] or let the server resolve one.
    pub fn new(config: TenantProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        let (state_tx, _) = watch::channel(TenantState::Uninitialized);
        Self {
            http,
            base_url: config.base_url,
            tenant_id: RwLock::new(None),
            state_tx,
        }
    }

    /// Create a provider already holding a tenant record, skipping the
    /// initial fetch.
    pub fn with_tenant(config: TenantProviderConfig, tenant: TenantSnapshot) -> Self {
        let provider = Self::new(config);
        *provider.tenant_id.write().expect("tenant id lock") = Some(tenant.id.clone());
        provider
            .state_tx
            .send_replace(TenantState::Loaded(tenant));
        provider
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<TenantState> {
        self.state_tx.subscribe()
    }

    /// The current state, cloned.
    pub fn current(&self) -> TenantState {
        self.state_tx.borrow().clone()
    }

    /// Fetch the current tenant record from the API.
    ///
    /// Publishes `Loading` first (dropping any previously loaded tenant),
    /// then `Loaded` or `Error`. Failed fetches are not retried.
    pub async fn load(&self) -> TenantState {
        self.state_tx.send_replace(TenantState::Loading);

        let mut request = self.http.get(format!("{}/api/tenant", self.base_url));
        let pinned = self.tenant_id.read().expect("tenant id lock").clone();
        if let Some(tenant_id) = pinned {
            request = request.header(crate::middleware::tenant::TENANT_HEADER, tenant_id);
        }

        let state = match request.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<TenantSnapshot>().await {
                    Ok(tenant) => TenantState::Loaded(tenant),
                    Err(err) => TenantState::Error(format!("Invalid tenant payload: {err}")),
                }
            }
            Ok(response) => TenantState::Error(format!(
                "Tenant fetch failed with status {}",
                response.status()
            )),
            Err(err) => TenantState::Error(format!("Tenant fetch failed: {err}")),
        };

        if let TenantState::Error(ref message) = state {
            tracing::warn!(error = %message, "Tenant provider fetch failed");
        }

        self.state_tx.send_replace(state.clone());
        state
    }

    /// Switch to another tenant and re-fetch its record. Downstream
    /// consumers refresh their own tenant-scoped data on the transition.
    pub async fn set_tenant(&self, tenant_id: impl Into<String>) -> TenantState {
        *self.tenant_id.write().expect("tenant id lock") = Some(tenant_id.into());
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let provider = TenantProvider::new(TenantProviderConfig::default());
        assert_eq!(provider.current(), TenantState::Uninitialized);
    }

    #[test]
    fn synchronously_supplied_tenant_skips_the_fetch() {
        let tenant = TenantSnapshot {
            id: "tenant-1".to_string(),
            name: "Willow Care".to_string(),
            domain: None,
            settings: serde_json::Value::Null,
            features: vec![],
            status: "active".to_string(),
        };
        let provider =
            TenantProvider::with_tenant(TenantProviderConfig::default(), tenant.clone());
        assert_eq!(provider.current(), TenantState::Loaded(tenant));
    }
}
