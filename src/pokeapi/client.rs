use crate::cache::{FetchError, FetchedBody};
use crate::config::ApiConfig;
use color_eyre::{eyre::eyre, Result};
use url::Url;

/// Plain HTTP client for the PokéAPI; no caching.
#[derive(Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .user_agent(config.user_agent.as_str())
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client })
  }

  /// GET `url` and return the status and full body.
  ///
  /// Error statuses are returned as a body, not an error; the cache layer
  /// decides what counts as a failure.
  pub async fn get(&self, url: &str) -> Result<FetchedBody, FetchError> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| FetchError::transport(url, e))?;

    let status = response.status().as_u16();
    let body = response
      .bytes()
      .await
      .map_err(|e| FetchError::transport(url, e))?;

    Ok(FetchedBody::new(status, body))
  }
}

/// Parse the configured base URL, forcing a trailing slash so that joined
/// paths append instead of replacing the last segment.
pub fn parse_base_url(base: &str) -> Result<Url> {
  let mut base = base.to_string();
  if !base.ends_with('/') {
    base.push('/');
  }
  Url::parse(&base).map_err(|e| eyre!("Invalid API base URL '{}': {}", base, e))
}

/// Build the URL for `resource/segment`, escaping the segment.
pub fn resource_url(base: &Url, resource: &str, segment: Option<&str>) -> Result<String> {
  let mut url = base
    .join(&format!("{}/", resource))
    .map_err(|e| eyre!("Failed to build URL for {}: {}", resource, e))?;

  if let Some(segment) = segment {
    url
      .path_segments_mut()
      .map_err(|_| eyre!("API base URL cannot have path segments"))?
      .pop_if_empty()
      .push(segment);
  }

  Ok(url.to_string())
}
