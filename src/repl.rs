//! The interactive read-eval-print loop.

use color_eyre::{eyre::eyre, Result};
use std::io::Write;
use tracing::{debug, info};

use crate::commands::{self, CommandKind, COMMANDS};
use crate::event::{Event, EventHandler};
use crate::pokeapi::{LocationPage, PokeApiClient};
use crate::pokedex::Pokedex;

/// Pagination state shared by `map` and `mapb`.
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
  next: Option<String>,
  previous: Option<String>,
}

/// What `map` or `mapb` should do next.
#[derive(Debug, PartialEq, Eq)]
pub enum PageRequest<'a> {
  /// Fetch the given page URL, or the first page for `None`
  Fetch(Option<&'a str>),
  AtLastPage,
  AtFirstPage,
}

impl PageCursor {
  pub fn forward(&self) -> PageRequest<'_> {
    match (&self.next, &self.previous) {
      (None, Some(_)) => PageRequest::AtLastPage,
      (next, _) => PageRequest::Fetch(next.as_deref()),
    }
  }

  pub fn back(&self) -> PageRequest<'_> {
    match &self.previous {
      Some(previous) => PageRequest::Fetch(Some(previous)),
      None => PageRequest::AtFirstPage,
    }
  }

  pub fn update(&mut self, page: &LocationPage) {
    self.next = page.next.clone();
    self.previous = page.previous.clone();
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
  Continue,
  Exit,
}

/// Interactive shell state
pub struct Repl {
  client: PokeApiClient,
  pokedex: Pokedex,
  cursor: PageCursor,
  prompt: String,
}

impl Repl {
  pub fn new(client: PokeApiClient, prompt: String) -> Self {
    Self {
      client,
      pokedex: Pokedex::new(),
      cursor: PageCursor::default(),
      prompt,
    }
  }

  /// Read commands until `exit`, Ctrl-C or end of input, then shut down
  /// the client.
  pub async fn run(mut self) -> Result<()> {
    let mut events = EventHandler::new();
    let mut out = std::io::stdout();

    loop {
      write!(out, "{}", self.prompt)?;
      out.flush()?;

      let flow = match events.next().await {
        Some(Event::Line(line)) => self.handle_line(&line, &mut out).await?,
        Some(Event::Interrupt) => {
          writeln!(out)?;
          self.exit(&mut out)?
        }
        Some(Event::Eof) | None => {
          writeln!(out)?;
          Flow::Exit
        }
      };

      if flow == Flow::Exit {
        break;
      }
    }

    info!("Shutting down");
    self.client.shutdown().await;
    Ok(())
  }

  /// Run one line of input. Command failures are printed, not returned.
  async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
    let words = commands::clean_input(line);
    let Some((name, args)) = words.split_first() else {
      return Ok(Flow::Continue);
    };

    let Some(command) = commands::find(name) else {
      writeln!(out, "Unknown command")?;
      let suggestions = commands::get_suggestions(name);
      if !suggestions.is_empty() {
        let names: Vec<&str> = suggestions.iter().map(|c| c.name).collect();
        writeln!(out, "Did you mean: {}?", names.join(", "))?;
      }
      return Ok(Flow::Continue);
    };

    debug!(command = command.name, ?args, "Running command");
    match self.execute(command.kind, args, out).await {
      Ok(flow) => Ok(flow),
      Err(e) => {
        writeln!(out, "Error: {}", e)?;
        Ok(Flow::Continue)
      }
    }
  }

  async fn execute<W: Write>(
    &mut self,
    kind: CommandKind,
    args: &[String],
    out: &mut W,
  ) -> Result<Flow> {
    match kind {
      CommandKind::Help => self.help(out)?,
      CommandKind::Exit => return self.exit(out),
      CommandKind::Map => self.map(out).await?,
      CommandKind::MapBack => self.map_back(out).await?,
      CommandKind::Explore => self.explore(required_arg(args, "explore <area>")?, out).await?,
      CommandKind::Catch => self.catch(required_arg(args, "catch <pokemon>")?, out).await?,
      CommandKind::Inspect => self.inspect(required_arg(args, "inspect <pokemon>")?, out)?,
      CommandKind::Pokedex => self.list_caught(out)?,
    }
    Ok(Flow::Continue)
  }

  fn help<W: Write>(&self, out: &mut W) -> Result<()> {
    writeln!(out, "Welcome to the Pokedex!")?;
    writeln!(out, "Usage:")?;
    writeln!(out)?;
    for cmd in COMMANDS {
      writeln!(out, "{}: {}", cmd.usage(), cmd.description)?;
    }
    Ok(())
  }

  fn exit<W: Write>(&self, out: &mut W) -> Result<Flow> {
    writeln!(out, "Closing the Pokedex... Goodbye!")?;
    Ok(Flow::Exit)
  }

  async fn map<W: Write>(&mut self, out: &mut W) -> Result<()> {
    let page_url = match self.cursor.forward() {
      PageRequest::Fetch(url) => url.map(String::from),
      PageRequest::AtLastPage => {
        writeln!(out, "you're on the last page")?;
        return Ok(());
      }
      PageRequest::AtFirstPage => {
        writeln!(out, "you're on the first page")?;
        return Ok(());
      }
    };
    self.show_page(page_url.as_deref(), out).await
  }

  async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<()> {
    let page_url = match self.cursor.back() {
      PageRequest::Fetch(url) => url.map(String::from),
      PageRequest::AtLastPage => {
        writeln!(out, "you're on the last page")?;
        return Ok(());
      }
      PageRequest::AtFirstPage => {
        writeln!(out, "you're on the first page")?;
        return Ok(());
      }
    };
    self.show_page(page_url.as_deref(), out).await
  }

  async fn show_page<W: Write>(&mut self, page_url: Option<&str>, out: &mut W) -> Result<()> {
    let page = self.client.get_locations(page_url).await?;
    for name in &page.names {
      writeln!(out, "{}", name)?;
    }
    self.cursor.update(&page);
    Ok(())
  }

  async fn explore<W: Write>(&self, area: &str, out: &mut W) -> Result<()> {
    writeln!(out, "Exploring {}...", area)?;
    let encounters = self.client.get_location_area(area).await?;
    if encounters.pokemon.is_empty() {
      writeln!(out, "No pokemon found in {}", encounters.name)?;
      return Ok(());
    }
    writeln!(out, "Found Pokemon in {}:", encounters.location)?;
    for name in &encounters.pokemon {
      writeln!(out, " - {}", name)?;
    }
    Ok(())
  }

  async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
    writeln!(out, "Throwing a Pokeball at {}...", name)?;
    let (pokemon, caught) = self.pokedex.catch(&self.client, name).await?;
    if caught {
      writeln!(out, "{} was caught!", pokemon.name)?;
      writeln!(out, "You may now inspect it with the inspect command.")?;
    } else {
      writeln!(out, "{} escaped!", pokemon.name)?;
    }
    Ok(())
  }

  fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
    let pokemon = self.pokedex.inspect(name)?;
    writeln!(out, "Name: {}", pokemon.name)?;
    writeln!(out, "Height: {}", pokemon.height)?;
    writeln!(out, "Weight: {}", pokemon.weight)?;
    writeln!(out, "Stats:")?;
    for stat in &pokemon.stats {
      writeln!(out, "  -{}: {}", stat.name, stat.value)?;
    }
    writeln!(out, "Types:")?;
    for type_name in &pokemon.types {
      writeln!(out, "  - {}", type_name)?;
    }
    Ok(())
  }

  fn list_caught<W: Write>(&self, out: &mut W) -> Result<()> {
    let caught = self.pokedex.caught();
    if caught.is_empty() {
      writeln!(out, "You haven't caught any pokemon yet")?;
      return Ok(());
    }
    writeln!(out, "Your Pokedex:")?;
    for name in caught {
      writeln!(out, " - {}", name)?;
    }
    Ok(())
  }
}

fn required_arg<'a>(args: &'a [String], usage: &str) -> Result<&'a str> {
  args
    .first()
    .map(String::as_str)
    .ok_or_else(|| eyre!("usage: {}", usage))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;

  const BASE: &str = "http://127.0.0.1:9/api/v2/";

  fn repl() -> Repl {
    let mut config = Config::default();
    config.api.base_url = BASE.to_string();
    config.api.timeout_secs = 2;
    let client = PokeApiClient::new(&config).unwrap();
    Repl::new(client, config.prompt)
  }

  async fn run_line(repl: &mut Repl, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = repl.handle_line(line, &mut out).await.unwrap();
    (flow, String::from_utf8(out).unwrap())
  }

  fn seed(repl: &Repl, url: &str, body: &str) {
    repl.client.cache().add(url, body.as_bytes().to_vec());
  }

  #[test]
  fn test_cursor_initial_state() {
    let cursor = PageCursor::default();
    assert_eq!(cursor.forward(), PageRequest::Fetch(None));
    assert_eq!(cursor.back(), PageRequest::AtFirstPage);
  }

  #[test]
  fn test_cursor_last_page() {
    let mut cursor = PageCursor::default();
    cursor.update(&LocationPage {
      names: vec![],
      next: None,
      previous: Some("p".to_string()),
    });
    assert_eq!(cursor.forward(), PageRequest::AtLastPage);
    assert_eq!(cursor.back(), PageRequest::Fetch(Some("p")));
  }

  #[test]
  fn test_cursor_first_page_after_fetch() {
    let mut cursor = PageCursor::default();
    cursor.update(&LocationPage {
      names: vec![],
      next: Some("n".to_string()),
      previous: None,
    });
    assert_eq!(cursor.forward(), PageRequest::Fetch(Some("n")));
    assert_eq!(cursor.back(), PageRequest::AtFirstPage);
  }

  #[tokio::test]
  async fn test_blank_line_is_ignored() {
    let mut repl = repl();
    let (flow, out) = run_line(&mut repl, "   ").await;
    assert_eq!(flow, Flow::Continue);
    assert!(out.is_empty());
  }

  #[tokio::test]
  async fn test_unknown_command_suggests() {
    let mut repl = repl();
    let (_, out) = run_line(&mut repl, "Expl").await;
    assert_eq!(out, "Unknown command\nDid you mean: explore?\n");
  }

  #[tokio::test]
  async fn test_help_lists_commands() {
    let mut repl = repl();
    let (_, out) = run_line(&mut repl, "HELP").await;
    assert!(out.starts_with("Welcome to the Pokedex!\n"));
    assert!(out.contains("catch <pokemon>: Try to catch a pokemon"));
  }

  #[tokio::test]
  async fn test_exit() {
    let mut repl = repl();
    let (flow, out) = run_line(&mut repl, "exit").await;
    assert_eq!(flow, Flow::Exit);
    assert_eq!(out, "Closing the Pokedex... Goodbye!\n");
  }

  #[tokio::test]
  async fn test_mapb_on_first_page() {
    let mut repl = repl();
    let (_, out) = run_line(&mut repl, "mapb").await;
    assert_eq!(out, "you're on the first page\n");
  }

  #[tokio::test]
  async fn test_map_pages_from_cache() {
    let mut repl = repl();
    let second = format!("{}location-area/?offset=2&limit=2", BASE);
    seed(
      &repl,
      &format!("{}location-area/", BASE),
      &format!(
        r#"{{"count":3,"next":"{}","previous":null,"results":[{{"name":"a"}},{{"name":"b"}}]}}"#,
        second
      ),
    );
    seed(
      &repl,
      &second,
      &format!(
        r#"{{"count":3,"next":null,"previous":"{}location-area/","results":[{{"name":"c"}}]}}"#,
        BASE
      ),
    );

    assert_eq!(run_line(&mut repl, "map").await.1, "a\nb\n");
    assert_eq!(run_line(&mut repl, "map").await.1, "c\n");
    assert_eq!(run_line(&mut repl, "map").await.1, "you're on the last page\n");
    assert_eq!(run_line(&mut repl, "mapb").await.1, "a\nb\n");
    assert_eq!(run_line(&mut repl, "mapb").await.1, "you're on the first page\n");
  }

  #[tokio::test]
  async fn test_explore_from_cache() {
    let mut repl = repl();
    seed(
      &repl,
      &format!("{}location-area/canalave-city-area", BASE),
      r#"{"id":1,"name":"canalave-city-area","location":{"name":"canalave-city"},
          "pokemon_encounters":[{"pokemon":{"name":"tentacool"}}]}"#,
    );

    let (_, out) = run_line(&mut repl, "explore canalave-city-area").await;
    assert_eq!(
      out,
      "Exploring canalave-city-area...\nFound Pokemon in canalave-city:\n - tentacool\n"
    );
  }

  #[tokio::test]
  async fn test_missing_argument() {
    let mut repl = repl();
    let (flow, out) = run_line(&mut repl, "catch").await;
    assert_eq!(flow, Flow::Continue);
    assert_eq!(out, "Error: usage: catch <pokemon>\n");
  }

  #[tokio::test]
  async fn test_network_error_is_printed() {
    let mut repl = repl();
    let (flow, out) = run_line(&mut repl, "explore nowhere").await;
    assert_eq!(flow, Flow::Continue);
    assert!(out.starts_with("Exploring nowhere...\nError: "));
  }

  #[tokio::test]
  async fn test_catch_and_inspect_from_cache() {
    let mut repl = repl();
    repl.pokedex = Pokedex::with_roll(Box::new(|_| true));
    seed(
      &repl,
      &format!("{}pokemon/pidgey", BASE),
      r#"{"id":16,"name":"pidgey","base_experience":50,"height":3,"weight":18,
          "stats":[{"base_stat":40,"stat":{"name":"hp"}}],
          "types":[{"slot":1,"type":{"name":"normal"}},{"slot":2,"type":{"name":"flying"}}]}"#,
    );

    let (_, out) = run_line(&mut repl, "catch pidgey").await;
    assert_eq!(
      out,
      "Throwing a Pokeball at pidgey...\npidgey was caught!\nYou may now inspect it with the inspect command.\n"
    );

    let (_, out) = run_line(&mut repl, "inspect pidgey").await;
    assert_eq!(
      out,
      "Name: pidgey\nHeight: 3\nWeight: 18\nStats:\n  -hp: 40\nTypes:\n  - normal\n  - flying\n"
    );

    let (_, out) = run_line(&mut repl, "pokedex").await;
    assert_eq!(out, "Your Pokedex:\n - pidgey\n");
  }

  #[tokio::test]
  async fn test_inspect_uncaught() {
    let mut repl = repl();
    let (_, out) = run_line(&mut repl, "inspect mew").await;
    assert_eq!(out, "Error: you have not caught that pokemon\n");
  }

  #[tokio::test]
  async fn test_empty_pokedex() {
    let mut repl = repl();
    let (_, out) = run_line(&mut repl, "pokedex").await;
    assert_eq!(out, "You haven't caught any pokemon yet\n");
  }
}
