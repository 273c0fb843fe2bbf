/// Available commands, lookup and autocomplete logic

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
  Help,
  Exit,
  Map,
  MapBack,
  Explore,
  Catch,
  Inspect,
  Pokedex,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub kind: CommandKind,
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  /// Argument placeholder shown in help, e.g. "<pokemon>"
  pub args: Option<&'static str>,
  pub description: &'static str,
}

impl Command {
  pub fn usage(&self) -> String {
    match self.args {
      Some(args) => format!("{} {}", self.name, args),
      None => self.name.to_string(),
    }
  }
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    kind: CommandKind::Help,
    name: "help",
    aliases: &["h", "?"],
    args: None,
    description: "Displays a help message",
  },
  Command {
    kind: CommandKind::Exit,
    name: "exit",
    aliases: &["quit", "q"],
    args: None,
    description: "Exit the Pokedex",
  },
  Command {
    kind: CommandKind::Map,
    name: "map",
    aliases: &["m"],
    args: None,
    description: "List locations from the map. Use 'mapb' to go back or 'map' again to go forward",
  },
  Command {
    kind: CommandKind::MapBack,
    name: "mapb",
    aliases: &["b"],
    args: None,
    description: "Show the previous page of locations",
  },
  Command {
    kind: CommandKind::Explore,
    name: "explore",
    aliases: &["e"],
    args: Some("<area>"),
    description: "List the pokemon found in a location area",
  },
  Command {
    kind: CommandKind::Catch,
    name: "catch",
    aliases: &["c"],
    args: Some("<pokemon>"),
    description: "Try to catch a pokemon",
  },
  Command {
    kind: CommandKind::Inspect,
    name: "inspect",
    aliases: &["i"],
    args: Some("<pokemon>"),
    description: "Show details of a caught pokemon",
  },
  Command {
    kind: CommandKind::Pokedex,
    name: "pokedex",
    aliases: &["p"],
    args: None,
    description: "List the pokemon you have caught",
  },
];

/// Split a line into lowercase words
pub fn clean_input(text: &str) -> Vec<String> {
  text.split_whitespace().map(str::to_lowercase).collect()
}

/// Find a command by exact name or alias
pub fn find(input: &str) -> Option<&'static Command> {
  COMMANDS
    .iter()
    .find(|cmd| cmd.name == input || cmd.aliases.contains(&input))
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    if cmd.name == input_lower {
      matches.push((cmd, 0));
      continue;
    }

    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 3));
    }
  }

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
