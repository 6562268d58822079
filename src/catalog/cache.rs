//! Short-lived cache of the raw manifest payload.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the cache envelope.
pub const CACHE_KEY: &str = "pdfs_cache_v1";

/// Default time a cached manifest stays fresh (10 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    /// Epoch milliseconds when the payload was fetched.
    #[serde(rename = "fetchedAt")]
    fetched_at: i64,
    payload: Value,
}

/// Stores the last fetched manifest payload with its fetch time.
#[derive(Clone)]
pub struct ManifestCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ManifestCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached payload if it was fetched less than `ttl` before `now_ms`.
    pub fn read_fresh(&self, now_ms: i64) -> Option<Value> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read manifest cache: {}", e);
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Ignoring corrupt manifest cache: {}", e);
                return None;
            }
        };

        let age_ms = now_ms.saturating_sub(envelope.fetched_at);
        // A fetch time in the future cannot be trusted.
        if (0..self.ttl.as_millis() as i64).contains(&age_ms) {
            debug!("Manifest cache hit ({}ms old)", age_ms);
            Some(envelope.payload)
        } else {
            debug!("Manifest cache expired ({}ms old)", age_ms);
            None
        }
    }

    /// Store `payload` as fetched at `now_ms`. Failures are logged only.
    pub fn write(&self, payload: &Value, now_ms: i64) {
        let envelope = CacheEnvelope {
            fetched_at: now_ms,
            payload: payload.clone(),
        };

        let result = serde_json::to_string(&envelope)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(CACHE_KEY, &raw));

        if let Err(e) = result {
            warn!("Could not write manifest cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageResult};
    use serde_json::json;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn test_fresh_payload_is_returned() {
        let cache = ManifestCache::new(Arc::new(MemoryStore::new()), TTL);
        let payload = json!({"items": [{"title": "A"}]});
        cache.write(&payload, 1_000_000);

        assert_eq!(cache.read_fresh(1_000_000 + 599_999), Some(payload));
    }

    #[test]
    fn test_expired_payload_is_ignored() {
        let cache = ManifestCache::new(Arc::new(MemoryStore::new()), TTL);
        cache.write(&json!([]), 1_000_000);

        assert_eq!(cache.read_fresh(1_000_000 + 600_000), None);
    }

    #[test]
    fn test_empty_cache() {
        let cache = ManifestCache::new(Arc::new(MemoryStore::new()), TTL);
        assert_eq!(cache.read_fresh(0), None);
    }

    #[test]
    fn test_corrupt_envelope_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(CACHE_KEY, "{\"fetchedAt\": \"yesterday\"}").unwrap();
        let cache = ManifestCache::new(store, TTL);
        assert_eq!(cache.read_fresh(0), None);
    }

    #[test]
    fn test_envelope_uses_camel_case_key() {
        let store = Arc::new(MemoryStore::new());
        let cache = ManifestCache::new(store.clone(), TTL);
        cache.write(&json!([]), 42);

        let raw = store.get(CACHE_KEY).unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["fetchedAt"], json!(42));
        assert_eq!(stored["payload"], json!([]));
    }

    #[test]
    fn test_future_fetch_time_is_expired() {
        let cache = ManifestCache::new(Arc::new(MemoryStore::new()), TTL);
        cache.write(&json!([]), 2_000_000);

        assert_eq!(cache.read_fresh(1_000_000), None);
        assert_eq!(cache.read_fresh(2_000_000), Some(json!([])));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let cache = ManifestCache::new(Arc::new(ReadOnlyStore), TTL);
        cache.write(&json!([{"title": "A"}]), 0);
        assert_eq!(cache.read_fresh(0), None);
    }
}
