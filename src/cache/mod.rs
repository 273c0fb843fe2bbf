//! In-memory response cache for API fetches.
//!
//! This module provides:
//! - A TTL-stamped byte store keyed by request URL
//! - A cancellable background sweeper that purges expired entries
//! - A cache-aside layer that decodes cached bytes or falls back to a fetch

mod clock;
mod error;
mod layer;
mod store;
mod sweeper;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use error::FetchError;
pub use layer::{CacheLayer, CacheSource, FetchedBody};
pub use store::TtlCache;
pub use sweeper::{spawn_sweeper, SweeperHandle};
