use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a cache-aside fetch.
///
/// A cached payload that no longer decodes is never reported here; it is
/// treated as a miss and refetched.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The request never produced a response body.
  #[error("request to {key} failed: {source}")]
  Transport {
    key: String,
    #[source]
    source: BoxError,
  },

  /// The server answered with a status of 400 or above.
  #[error("request to {key} returned status {status}: {body}")]
  Status {
    key: String,
    status: u16,
    body: String,
  },

  /// A fresh response did not match the expected shape.
  #[error("failed to decode response from {key}: {source}")]
  Decode {
    key: String,
    #[source]
    source: BoxError,
  },
}

impl FetchError {
  pub fn transport(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
    Self::Transport {
      key: key.into(),
      source: source.into(),
    }
  }
}
