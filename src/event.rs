use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::warn;

/// Input events for the shell
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
  /// A line typed by the user, without the trailing newline
  Line(String),
  /// Ctrl-C
  Interrupt,
  /// Stdin closed
  Eof,
}

/// Event handler that produces events from stdin and Ctrl-C
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Blocking stdin reads run on a plain thread so an unfinished read
    // never holds up runtime shutdown.
    let stdin_tx = tx.clone();
    std::thread::spawn(move || read_lines(std::io::stdin().lock(), stdin_tx));

    tokio::spawn(async move {
      loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
          warn!("Failed to listen for Ctrl-C: {}", e);
          break;
        }
        if tx.send(Event::Interrupt).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

fn read_lines(reader: impl BufRead, tx: mpsc::UnboundedSender<Event>) {
  for line in reader.lines() {
    match line {
      Ok(line) => {
        if tx.send(Event::Line(line)).is_err() {
          return;
        }
      }
      Err(e) => {
        warn!("Failed to read stdin: {}", e);
        break;
      }
    }
  }
  let _ = tx.send(Event::Eof);
}
