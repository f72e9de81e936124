//! In-memory TTL cache for LLM responses.
//!
//! Keys are the SHA-256 of the JSON-encoded key parts, so any serializable
//! tuple (provider, model, prompt, ...) can address an entry.

pub mod handlers;

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry {
    value: String,
    inserted_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
}

pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Derives the cache key for a set of key parts.
    pub fn key<K: Serialize + ?Sized>(parts: &K) -> String {
        let encoded = serde_json::to_vec(parts).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        format!("{:x}", hasher.finalize())
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) > self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let hit = entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, Instant::now()))
            .map(|entry| entry.value.clone());

        if hit.is_some() {
            debug!("Cache HIT for key: {}...", &key[..key.len().min(8)]);
        } else {
            debug!("Cache MISS for key: {}...", &key[..key.len().min(8)]);
        }
        hit
    }

    pub async fn set(&self, key: String, value: String) {
        debug!("Cache SET for key: {}...", &key[..key.len().min(8)]);
        self.entries.write().await.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Removes expired entries and returns how many were dropped.
    pub async fn clear_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) <= self.ttl);
        let removed = before - entries.len();
        debug!("Cleared {removed} expired cache entries");
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("Cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read().await;
        CacheStats {
            total_entries: entries.len(),
            expired_entries: entries
                .values()
                .filter(|entry| self.is_expired(entry, now))
                .count(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
