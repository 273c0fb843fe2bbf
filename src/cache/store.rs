//! In-memory response store with per-entry expiration.

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::clock::Clock;
#[cfg(test)]
use super::clock::SystemClock;

#[derive(Debug, Clone)]
struct CacheEntry {
  value: Bytes,
  expires_at: DateTime<Utc>,
}

/// Thread-safe map from request URL to raw response bytes.
///
/// Expiration is enforced only by [`TtlCache::sweep`]. `get` returns whatever
/// is still in the map, so an entry can be served for up to one sweep period
/// past its `expires_at`. With the sweep period equal to the TTL, callers see
/// data at most `2 * ttl` old.
pub struct TtlCache {
  ttl: Duration,
  clock: Arc<dyn Clock>,
  entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TtlCache {
  /// Create a cache on the system clock.
  #[cfg(test)]
  pub fn new(ttl: Duration) -> Self {
    Self::with_clock(ttl, Arc::new(SystemClock))
  }

  pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
    Self {
      ttl,
      clock,
      entries: RwLock::new(HashMap::new()),
    }
  }

  /// Look up the bytes stored for `key`.
  pub fn get(&self, key: &str) -> Option<Bytes> {
    self.entries.read().get(key).map(|entry| entry.value.clone())
  }

  /// Insert or replace the entry for `key`, expiring `ttl` from now.
  pub fn add(&self, key: impl Into<String>, value: impl Into<Bytes>) {
    let entry = CacheEntry {
      value: value.into(),
      expires_at: self.clock.now() + self.ttl,
    };
    self.entries.write().insert(key.into(), entry);
  }

  /// Remove every entry whose expiration is at or before now.
  ///
  /// Returns the number of entries removed.
  pub fn sweep(&self) -> usize {
    let now = self.clock.now();
    let mut entries = self.entries.write();
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  #[allow(dead_code)]
  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }
}
