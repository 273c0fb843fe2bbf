//! PokéAPI client that wraps HttpFetcher with transparent caching.

use chrono::Duration;
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::cache::{
  spawn_sweeper, CacheLayer, CacheSource, Clock, SweeperHandle, SystemClock, TtlCache,
};
use crate::config::Config;

use super::api_types::{ApiLocationArea, ApiNamedResource, ApiPaginatedResponse, ApiPokemon};
use super::client::{parse_base_url, resource_url, HttpFetcher};
use super::types::{AreaEncounters, LocationPage, Pokemon};

/// PokéAPI client with an in-memory response cache.
///
/// The client owns its cache and the sweeper task that purges it; call
/// [`PokeApiClient::shutdown`] to stop the sweeper.
pub struct PokeApiClient {
  inner: HttpFetcher,
  cache: CacheLayer,
  base_url: Url,
  sweeper: SweeperHandle,
}

impl PokeApiClient {
  /// Create a new cached client. Must be called inside a tokio runtime.
  pub fn new(config: &Config) -> Result<Self> {
    Self::with_clock(config, Arc::new(SystemClock))
  }

  pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
    let inner = HttpFetcher::new(&config.api)?;
    let base_url = parse_base_url(&config.api.base_url)?;

    let ttl = Duration::from_std(config.cache.ttl())
      .map_err(|e| eyre!("Invalid cache TTL: {}", e))?;
    let store = Arc::new(TtlCache::with_clock(ttl, clock));
    let sweep_interval = config.cache.sweep_interval();
    let sweeper = spawn_sweeper(Arc::clone(&store), sweep_interval);

    info!(
      base_url = %base_url,
      ttl_secs = config.cache.ttl_secs,
      sweep_interval_secs = sweep_interval.as_secs(),
      "PokéAPI client ready"
    );

    Ok(Self {
      inner,
      cache: CacheLayer::new(store),
      base_url,
      sweeper,
    })
  }

  /// List a page of location areas.
  ///
  /// `page_url` is a `next`/`previous` link from an earlier page; `None`
  /// requests the first page.
  pub async fn get_locations(&self, page_url: Option<&str>) -> Result<LocationPage> {
    let url = match page_url {
      Some(url) => url.to_string(),
      None => resource_url(&self.base_url, "location-area", None)?,
    };

    let result = self
      .cache
      .fetch_json::<ApiPaginatedResponse<ApiNamedResource>, _, _>(&url, || self.inner.get(&url))
      .await?;

    log_source(&url, result.source);
    Ok(result.data.into())
  }

  /// Get the pokemon encounters for a location area.
  pub async fn get_location_area(&self, name: &str) -> Result<AreaEncounters> {
    let url = resource_url(&self.base_url, "location-area", Some(name))?;

    let result = self
      .cache
      .fetch_json::<ApiLocationArea, _, _>(&url, || self.inner.get(&url))
      .await?;

    log_source(&url, result.source);
    Ok(result.data.into())
  }

  /// Get a single pokemon by name.
  pub async fn get_pokemon(&self, name: &str) -> Result<Pokemon> {
    let url = resource_url(&self.base_url, "pokemon", Some(name))?;

    let result = self
      .cache
      .fetch_json::<ApiPokemon, _, _>(&url, || self.inner.get(&url))
      .await?;

    log_source(&url, result.source);
    Ok(result.data.into())
  }

  #[cfg(test)]
  pub(crate) fn cache(&self) -> &Arc<TtlCache> {
    self.cache.cache()
  }

  /// Stop the cache sweeper and wait for it to exit.
  pub async fn shutdown(self) {
    self.sweeper.shutdown().await;
  }
}

fn log_source(url: &str, source: CacheSource) {
  debug!(url, ?source, "Fetched");
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::ManualClock;

  fn offline_config() -> Config {
    let mut config = Config::default();
    // Nothing listens here; any network access fails fast.
    config.api.base_url = "http://127.0.0.1:9/api/v2/".to_string();
    config.api.timeout_secs = 2;
    config
  }

  #[tokio::test]
  async fn test_cached_locations_served_without_network() {
    let client = PokeApiClient::new(&offline_config()).unwrap();
    let url = "http://127.0.0.1:9/api/v2/location-area/";
    client.cache().add(
      url,
      br#"{"count":2,"next":"http://127.0.0.1:9/api/v2/location-area/?offset=2","previous":null,
          "results":[{"name":"a","url":""},{"name":"b","url":""}]}"#
        .to_vec(),
    );

    let page = client.get_locations(None).await.unwrap();
    assert_eq!(page.names, vec!["a", "b"]);
    assert!(page.next.is_some());
    client.shutdown().await;
  }

  #[tokio::test]
  async fn test_cached_pokemon_served_without_network() {
    let client = PokeApiClient::new(&offline_config()).unwrap();
    client.cache().add(
      "http://127.0.0.1:9/api/v2/pokemon/pikachu",
      br#"{"id":25,"name":"pikachu","base_experience":112}"#.to_vec(),
    );

    let pokemon = client.get_pokemon("pikachu").await.unwrap();
    assert_eq!(pokemon.base_experience, 112);
    client.shutdown().await;
  }

  #[tokio::test]
  async fn test_network_failure_surfaces_and_caches_nothing() {
    let client = PokeApiClient::new(&offline_config()).unwrap();
    assert!(client.get_location_area("nowhere").await.is_err());
    assert!(client.cache().is_empty());
    client.shutdown().await;
  }

  #[tokio::test(start_paused = true)]
  async fn test_expired_entries_swept_by_client() {
    let clock = Arc::new(ManualClock::new());
    let client = PokeApiClient::with_clock(&offline_config(), clock.clone()).unwrap();
    client.cache().add("http://127.0.0.1:9/api/v2/pokemon/ditto", b"{}".to_vec());

    clock.advance(Duration::minutes(6));
    tokio::time::sleep(std::time::Duration::from_secs(301)).await;

    assert!(client.cache().is_empty());
    client.shutdown().await;
  }
}
