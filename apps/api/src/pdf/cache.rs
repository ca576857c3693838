#![allow(dead_code)]

//! Process-lifetime response cache for generated PDFs.
//!
//! TTL plus capacity eviction, not LRU: expiry is judged on `created_at`
//! only, and over-capacity eviction removes the oldest-created entries
//! first regardless of access pattern. Injected through `AppState`, never a
//! module-level singleton. There is no coalescing of concurrent identical
//! misses; both requests regenerate and the second `set` wins.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use uuid::Uuid;

/// Hex characters kept from the digest. Collisions at this length are
/// acceptable for a cache; this is not a security boundary.
const KEY_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct CachedPdf {
    pub bytes: Bytes,
    pub file_name: String,
    pub created_at: Instant,
}

#[derive(Debug)]
pub struct PdfCache {
    entries: HashMap<String, CachedPdf>,
    ttl: Duration,
    max_entries: usize,
}

impl PdfCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Content-addressed key over everything that affects the rendered bytes.
    pub fn make_key(resume_id: Uuid, template_id: &str, customization: &Value) -> String {
        let payload = json!({
            "resume_id": resume_id,
            "template_id": template_id,
            "customization": customization,
        });
        let digest = Sha256::digest(payload.to_string().as_bytes());
        digest
            .iter()
            .flat_map(|b| [b >> 4, b & 0xf])
            .map(|n| char::from_digit(n as u32, 16).unwrap_or('0'))
            .take(KEY_LEN)
            .collect()
    }

    /// Prunes, then returns the cached entry if it survived.
    pub fn get(&mut self, key: &str) -> Option<CachedPdf> {
        self.prune();
        self.entries.get(key).cloned()
    }

    pub fn set(&mut self, key: String, value: CachedPdf) {
        self.entries.insert(key, value);
    }

    /// Drops expired entries, then evicts oldest-first down to capacity.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.duration_since(e.created_at) <= ttl);

        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    self.entries.remove(&k);
                }
                None => break,
            }
        }
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
    use tokio::time::advance;

    fn entry(label: &str) -> CachedPdf {
        CachedPdf {
            bytes: Bytes::from(label.as_bytes().to_vec()),
            file_name: format!("{label}.pdf"),
            created_at: Instant::now(),
        }
    }

    #[test]
    fn test_make_key_is_deterministic_and_truncated() {
        let id = Uuid::nil();
        let custom = json!({"accent": "#336699"});
        let a = PdfCache::make_key(id, "classic", &custom);
        let b = PdfCache::make_key(id, "classic", &custom);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_make_key_varies_with_every_input() {
        let id = Uuid::nil();
        let custom = json!({});
        let base = PdfCache::make_key(id, "classic", &custom);
        assert_ne!(base, PdfCache::make_key(Uuid::max(), "classic", &custom));
        assert_ne!(base, PdfCache::make_key(id, "modern", &custom));
        assert_ne!(base, PdfCache::make_key(id, "classic", &json!({"x": 1})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get_within_ttl() {
        let mut cache = PdfCache::new(Duration::from_secs(300), 50);
        cache.set("k".to_string(), entry("a"));
        let hit = cache.get("k").expect("entry still fresh");
        assert_eq!(hit.bytes.as_ref(), b"a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let mut cache = PdfCache::new(Duration::from_secs(300), 50);
        cache.set("k".to_string(), entry("a"));

        advance(Duration::from_secs(301)).await;
        cache.prune();
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest_created_first() {
        let mut cache = PdfCache::new(Duration::from_secs(300), 3);
        for label in ["a", "b", "c", "d", "e"] {
            cache.set(label.to_string(), entry(label));
            advance(Duration::from_millis(1)).await;
        }
        cache.prune();

        assert_eq!(cache.len(), 3);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
        // Newest entries always survive a purely capacity-driven prune.
        assert!(cache.get("c").is_some());
        assert!(cache.get("d").is_some());
        assert!(cache.get("e").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_prunes_before_lookup() {
        let mut cache = PdfCache::new(Duration::from_secs(10), 50);
        cache.set("old".to_string(), entry("a"));
        advance(Duration::from_secs(11)).await;
        // No explicit prune; get must do it.
        assert!(cache.get("old").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_refreshes_entry() {
        let mut cache = PdfCache::new(Duration::from_secs(10), 50);
        cache.set("k".to_string(), entry("stale"));
        advance(Duration::from_secs(8)).await;
        cache.set("k".to_string(), entry("fresh"));
        advance(Duration::from_secs(8)).await;

        let hit = cache.get("k").expect("refreshed entry outlives first TTL");
        assert_eq!(hit.bytes.as_ref(), b"fresh");
    }
}
