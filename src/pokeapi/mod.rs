//! PokéAPI access: wire types, HTTP transport and the cached client.

pub mod api_types;
pub mod cached_client;
pub mod client;
pub mod types;

pub use cached_client::PokeApiClient;
pub use types::{LocationPage, Pokemon};
