//! The player's collection and the rules for catching pokemon.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use rand::Rng;
use std::collections::HashMap;

use crate::pokeapi::{PokeApiClient, Pokemon};

/// Anything that can look up a pokemon by name.
#[async_trait]
pub trait PokemonSource: Send + Sync {
  async fn get_pokemon(&self, name: &str) -> Result<Pokemon>;
}

#[async_trait]
impl PokemonSource for PokeApiClient {
  async fn get_pokemon(&self, name: &str) -> Result<Pokemon> {
    PokeApiClient::get_pokemon(self, name).await
  }
}

/// Decides whether a throw succeeds, given the pokemon's base experience.
pub type Roll = Box<dyn Fn(u32) -> bool + Send + Sync>;

#[derive(Debug, Clone)]
struct PokedexEntry {
  pokemon: Pokemon,
  caught: bool,
}

/// Pokemon the player has encountered, keyed by name.
pub struct Pokedex {
  collection: HashMap<String, PokedexEntry>,
  roll: Roll,
}

impl Default for Pokedex {
  fn default() -> Self {
    Self::with_roll(Box::new(default_roll))
  }
}

impl Pokedex {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_roll(roll: Roll) -> Self {
    Self {
      collection: HashMap::new(),
      roll,
    }
  }

  /// Throw a ball at `name`.
  ///
  /// A pokemon seen before is re-rolled from the stored record without a
  /// lookup. Once caught, it stays caught.
  pub async fn catch<S>(&mut self, source: &S, name: &str) -> Result<(Pokemon, bool)>
  where
    S: PokemonSource + ?Sized,
  {
    if let Some(entry) = self.collection.get_mut(name) {
      let caught = (self.roll)(entry.pokemon.base_experience);
      entry.caught |= caught;
      return Ok((entry.pokemon.clone(), caught));
    }

    let pokemon = source.get_pokemon(name).await?;
    let caught = (self.roll)(pokemon.base_experience);
    self.collection.insert(
      name.to_string(),
      PokedexEntry {
        pokemon: pokemon.clone(),
        caught,
      },
    );
    Ok((pokemon, caught))
  }

  /// Details of a caught pokemon.
  pub fn inspect(&self, name: &str) -> Result<&Pokemon> {
    match self.collection.get(name) {
      Some(entry) if entry.caught => Ok(&entry.pokemon),
      _ => Err(eyre!("you have not caught that pokemon")),
    }
  }

  /// Names of all caught pokemon, sorted.
  pub fn caught(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self
      .collection
      .iter()
      .filter(|(_, entry)| entry.caught)
      .map(|(name, _)| name.as_str())
      .collect();
    names.sort_unstable();
    names
  }
}

/// One in `max(1, sqrt(base_experience - 40))` chance of a catch.
fn catch_odds(base_experience: u32) -> u64 {
  let exp = f64::from(base_experience.saturating_sub(40).max(1));
  (exp.sqrt() as u64).max(1)
}

fn default_roll(base_experience: u32) -> bool {
  let odds = catch_odds(base_experience);
  rand::thread_rng().gen_range(1..=odds) == 1
}
