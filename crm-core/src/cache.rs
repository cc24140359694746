//! In-process TTL cache, partitioned by tenant.
//!
//! Keys are composite `(tenant_id, key)` pairs: the API itself demands a
//! tenant identifier, so two tenants can never collide on the same key
//! name no matter what the caller does.

use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    tenant_id: String,
    key: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// Shared tenant-partitioned cache. Cheap to clone via `Arc` wrapping at
/// the call site; internally a concurrent map.
#[derive(Debug, Default)]
pub struct TenantCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl TenantCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value for a tenant. `ttl = None` means no expiry.
    pub fn put(
        &self,
        tenant_id: &str,
        key: &str,
        value: serde_json::Value,
        ttl: Option<Duration>,
    ) {
        let entry = CacheEntry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.insert(
            CacheKey {
                tenant_id: tenant_id.to_string(),
                key: key.to_string(),
            },
            entry,
        );
    }

    /// Read a value. A read past expiry is treated as absent and evicts
    /// the entry.
    pub fn get(&self, tenant_id: &str, key: &str) -> Option<serde_json::Value> {
        let cache_key = CacheKey {
            tenant_id: tenant_id.to_string(),
            key: key.to_string(),
        };
        let now = Instant::now();

        let expired = match self.entries.get(&cache_key) {
            Some(entry) if entry.is_expired(now) => true,
            Some(entry) => return Some(entry.value.clone()),
            None => return None,
        };
        if expired {
            self.entries.remove(&cache_key);
        }
        None
    }

    pub fn remove(&self, tenant_id: &str, key: &str) -> Option<serde_json::Value> {
        self.entries
            .remove(&CacheKey {
                tenant_id: tenant_id.to_string(),
                key: key.to_string(),
            })
            .map(|(_, entry)| entry.value)
    }

    /// Drop every entry belonging to one tenant.
    pub fn clear_tenant(&self, tenant_id: &str) {
        self.entries.retain(|key, _| key.tenant_id != tenant_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_before_expiry_returns_exact_value() {
        let cache = TenantCache::new();
        cache.put(
            "tenant-1",
            "patients:list",
            json!({"count": 3}),
            Some(Duration::from_secs(60)),
        );
        assert_eq!(
            cache.get("tenant-1", "patients:list"),
            Some(json!({"count": 3}))
        );
    }

    #[test]
    fn read_past_expiry_is_absent_and_evicts() {
        let cache = TenantCache::new();
        cache.put(
            "tenant-1",
            "patients:list",
            json!(1),
            Some(Duration::from_millis(10)),
        );
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("tenant-1", "patients:list"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_without_ttl_never_expire() {
        let cache = TenantCache::new();
        cache.put("tenant-1", "settings", json!("sticky"), None);
        std::thread::sleep(Duration::from_millis(15));
        assert_eq!(cache.get("tenant-1", "settings"), Some(json!("sticky")));
    }

    #[test]
    fn tenants_never_collide_on_the_same_key_name() {
        let cache = TenantCache::new();
        cache.put("tenant-1", "dashboard", json!("one"), None);
        cache.put("tenant-2", "dashboard", json!("two"), None);
        assert_eq!(cache.get("tenant-1", "dashboard"), Some(json!("one")));
        assert_eq!(cache.get("tenant-2", "dashboard"), Some(json!("two")));
    }

    #[test]
    fn clear_tenant_leaves_other_tenants_untouched() {
        let cache = TenantCache::new();
        cache.put("tenant-1", "a", json!(1), None);
        cache.put("tenant-1", "b", json!(2), None);
        cache.put("tenant-2", "a", json!(3), None);
        cache.clear_tenant("tenant-1");
        assert_eq!(cache.get("tenant-1", "a"), None);
        assert_eq!(cache.get("tenant-1", "b"), None);
        assert_eq!(cache.get("tenant-2", "a"), Some(json!(3)));
    }
}
