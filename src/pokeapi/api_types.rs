//! Serde-deserializable types matching PokéAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

// ============================================================================
// Common nested field types
// ============================================================================

/// A `{ name, url }` reference to another resource; only the name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNamedResource {
  pub name: String,
}

/// Paged list envelope used by every list endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiPaginatedResponse<T> {
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

// ============================================================================
// Location area endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPokemonEncounter {
  pub pokemon: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiLocationArea {
  pub name: String,
  pub location: ApiNamedResource,
  #[serde(default)]
  pub pokemon_encounters: Vec<ApiPokemonEncounter>,
}

// ============================================================================
// Pokemon endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPokemonStat {
  pub base_stat: u32,
  pub stat: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemonType {
  pub slot: u32,
  #[serde(rename = "type")]
  pub type_ref: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
  pub id: u64,
  pub name: String,
  // null for some alternate forms
  pub base_experience: Option<u32>,
  #[serde(default)]
  pub height: u32,
  #[serde(default)]
  pub weight: u32,
  #[serde(default)]
  pub stats: Vec<ApiPokemonStat>,
  #[serde(default)]
  pub types: Vec<ApiPokemonType>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

use super::types::{AreaEncounters, LocationPage, Pokemon, PokemonStat};

impl From<ApiPaginatedResponse<ApiNamedResource>> for LocationPage {
  fn from(resp: ApiPaginatedResponse<ApiNamedResource>) -> Self {
    LocationPage {
      names: resp.results.into_iter().map(|r| r.name).collect(),
      next: resp.next,
      previous: resp.previous,
    }
  }
}

impl From<ApiLocationArea> for AreaEncounters {
  fn from(area: ApiLocationArea) -> Self {
    AreaEncounters {
      name: area.name,
      location: area.location.name,
      pokemon: area
        .pokemon_encounters
        .into_iter()
        .map(|e| e.pokemon.name)
        .collect(),
    }
  }
}

impl From<ApiPokemon> for Pokemon {
  fn from(p: ApiPokemon) -> Self {
    let mut types = p.types;
    types.sort_by_key(|t| t.slot);

    Pokemon {
      id: p.id,
      name: p.name,
      base_experience: p.base_experience.unwrap_or_default(),
      height: p.height,
      weight: p.weight,
      stats: p
        .stats
        .into_iter()
        .map(|s| PokemonStat {
          name: s.stat.name,
          value: s.base_stat,
        })
        .collect(),
      types: types.into_iter().map(|t| t.type_ref.name).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const LOCATION_PAGE: &str = r#"{
    "count": 1089,
    "next": "https://pokeapi.co/api/v2/location-area/?offset=20&limit=20",
    "previous": null,
    "results": [
      {"name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/"},
      {"name": "eterna-city-area", "url": "https://pokeapi.co/api/v2/location-area/2/"}
    ]
  }"#;

  const POKEMON: &str = r#"{
    "id": 25,
    "name": "pikachu",
    "base_experience": 112,
    "height": 4,
    "weight": 60,
    "stats": [
      {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
      {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": ""}}
    ],
    "types": [
      {"slot": 2, "type": {"name": "flying", "url": ""}},
      {"slot": 1, "type": {"name": "electric", "url": ""}}
    ]
  }"#;

  #[test]
  fn test_location_page_conversion() {
    let api: ApiPaginatedResponse<ApiNamedResource> = serde_json::from_str(LOCATION_PAGE).unwrap();
    let page = LocationPage::from(api);
    assert_eq!(page.names, vec!["canalave-city-area", "eterna-city-area"]);
    assert!(page.next.is_some());
    assert!(page.previous.is_none());
  }

  #[test]
  fn test_location_area_conversion() {
    let json = r#"{
      "id": 1,
      "name": "canalave-city-area",
      "game_index": 1,
      "encounter_method_rates": [],
      "location": {"name": "canalave-city", "url": ""},
      "names": [],
      "pokemon_encounters": [
        {"pokemon": {"name": "tentacool", "url": ""}, "version_details": [
          {"version": {"name": "diamond", "url": ""}, "max_chance": 60, "encounter_details": [
            {"min_level": 20, "max_level": 30, "condition_values": [], "chance": 60,
             "method": {"name": "surf", "url": ""}}
          ]}
        ]},
        {"pokemon": {"name": "tentacruel", "url": ""}, "version_details": []}
      ]
    }"#;
    let api: ApiLocationArea = serde_json::from_str(json).unwrap();
    let area = AreaEncounters::from(api);
    assert_eq!(area.location, "canalave-city");
    assert_eq!(area.pokemon, vec!["tentacool", "tentacruel"]);
  }

  #[test]
  fn test_location_area_ignores_encounter_details() {
    // Encounter rates and version details are not decoded, so their shape
    // does not matter.
    let json = r#"{
      "name": "route-201-area",
      "location": {"name": "route-201"},
      "encounter_method_rates": [{"version_details": [{"rate": null}]}],
      "names": [{"name": "Route 201"}],
      "pokemon_encounters": [
        {"pokemon": {"name": "starly"}, "version_details": [{"encounter_details": [{}]}]}
      ]
    }"#;
    let api: ApiLocationArea = serde_json::from_str(json).unwrap();
    let area = AreaEncounters::from(api);
    assert_eq!(area.name, "route-201-area");
    assert_eq!(area.pokemon, vec!["starly"]);
  }

  #[test]
  fn test_location_area_without_encounters() {
    let json = r#"{"name": "empty-area", "location": {"name": "nowhere"}}"#;
    let api: ApiLocationArea = serde_json::from_str(json).unwrap();
    assert!(AreaEncounters::from(api).pokemon.is_empty());
  }

  #[test]
  fn test_pokemon_conversion_orders_types_by_slot() {
    let api: ApiPokemon = serde_json::from_str(POKEMON).unwrap();
    let pokemon = Pokemon::from(api);
    assert_eq!(pokemon.base_experience, 112);
    assert_eq!(pokemon.types, vec!["electric", "flying"]);
    assert_eq!(pokemon.stats[0].name, "hp");
    assert_eq!(pokemon.stats[0].value, 35);
  }

  #[test]
  fn test_null_base_experience() {
    let json = r#"{"id": 10001, "name": "deoxys-attack", "base_experience": null}"#;
    let pokemon = Pokemon::from(serde_json::from_str::<ApiPokemon>(json).unwrap());
    assert_eq!(pokemon.base_experience, 0);
    assert!(pokemon.types.is_empty());
  }
}
