/// One page of location-area names
#[derive(Debug, Clone, Default)]
pub struct LocationPage {
  pub names: Vec<String>,
  /// URL of the next page, if any
  pub next: Option<String>,
  /// URL of the previous page, if any
  pub previous: Option<String>,
}

/// Pokemon that can be encountered in a location area
#[derive(Debug, Clone)]
pub struct AreaEncounters {
  pub name: String,
  pub location: String,
  pub pokemon: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonStat {
  pub name: String,
  pub value: u32,
}

/// Pokemon details
#[derive(Debug, Clone, Default)]
pub struct Pokemon {
  pub id: u64,
  pub name: String,
  pub base_experience: u32,
  pub height: u32,
  pub weight: u32,
  pub stats: Vec<PokemonStat>,
  pub types: Vec<String>, // ordered by slot
}
