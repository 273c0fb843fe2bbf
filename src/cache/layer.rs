//! Cache layer that orchestrates caching logic with network fetching.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::{BoxError, FetchError};
use super::store::TtlCache;

/// Raw result of a network round-trip.
#[derive(Debug, Clone)]
pub struct FetchedBody {
  pub status: u16,
  pub body: Bytes,
}

impl FetchedBody {
  pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  pub fn is_failure(&self) -> bool {
    self.status >= 400
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Decoded from a cached payload
  Cache,
  /// Fetched from the network on this call
  Network,
}

/// Decoded data plus where it came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
}

/// Cache-aside wrapper around a [`TtlCache`].
///
/// This layer sits between the API client and the network, storing raw
/// response bytes keyed by request URL.
#[derive(Clone)]
pub struct CacheLayer {
  cache: Arc<TtlCache>,
}

impl CacheLayer {
  pub fn new(cache: Arc<TtlCache>) -> Self {
    Self { cache }
  }

  #[cfg(test)]
  pub fn cache(&self) -> &Arc<TtlCache> {
    &self.cache
  }

  /// Fetch with cache-first strategy.
  ///
  /// 1. Check cache - if the payload decodes, return it
  /// 2. Otherwise call `fetcher` exactly once
  /// 3. Decode the fresh body, failing on a shape mismatch
  /// 4. Store the raw bytes under `key`
  ///
  /// Nothing is written on any failure. Concurrent misses for the same key
  /// each call their own fetcher; the last store wins.
  pub async fn fetch<T, E, D, F, Fut>(
    &self,
    key: &str,
    decode: D,
    fetcher: F,
  ) -> Result<CacheResult<T>, FetchError>
  where
    D: Fn(&[u8]) -> Result<T, E>,
    E: Into<BoxError>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FetchedBody, FetchError>>,
  {
    if let Some(cached) = self.cache.get(key) {
      match decode(&cached) {
        Ok(data) => {
          debug!(key, "Cache hit");
          return Ok(CacheResult {
            data,
            source: CacheSource::Cache,
          });
        }
        Err(e) => {
          let e: BoxError = e.into();
          warn!(key, error = %e, "Cached payload failed to decode, refetching");
        }
      }
    } else {
      debug!(key, "Cache miss");
    }

    let fetched = fetcher().await?;
    if fetched.is_failure() {
      return Err(FetchError::Status {
        key: key.to_string(),
        status: fetched.status,
        body: String::from_utf8_lossy(&fetched.body).into_owned(),
      });
    }

    let data = decode(&fetched.body).map_err(|e| FetchError::Decode {
      key: key.to_string(),
      source: e.into(),
    })?;

    self.cache.add(key, fetched.body);
    Ok(CacheResult {
      data,
      source: CacheSource::Network,
    })
  }

  /// [`CacheLayer::fetch`] with a JSON decoder.
  pub async fn fetch_json<T, F, Fut>(&self, key: &str, fetcher: F) -> Result<CacheResult<T>, FetchError>
  where
    T: DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FetchedBody, FetchError>>,
  {
    self
      .fetch(key, |bytes| serde_json::from_slice::<T>(bytes), fetcher)
      .await
  }
}
