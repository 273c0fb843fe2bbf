//! Background task that purges expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::store::TtlCache;

/// Handle to a running sweeper.
///
/// Dropping the handle stops the task at its next wakeup; call
/// [`SweeperHandle::shutdown`] to stop it and wait for it to exit.
pub struct SweeperHandle {
  stop_tx: oneshot::Sender<()>,
  task: JoinHandle<()>,
}

impl SweeperHandle {
  /// Signal the sweeper to stop and wait until it has exited.
  pub async fn shutdown(self) {
    // The receiver is gone only if the task already finished.
    let _ = self.stop_tx.send(());
    if let Err(e) = self.task.await {
      warn!("Cache sweeper exited abnormally: {}", e);
    }
  }

  #[allow(dead_code)]
  pub fn is_finished(&self) -> bool {
    self.task.is_finished()
  }
}

/// Spawn a task that calls [`TtlCache::sweep`] once every `period`.
///
/// The first sweep runs one full period after spawning.
pub fn spawn_sweeper(cache: Arc<TtlCache>, period: Duration) -> SweeperHandle {
  let (stop_tx, mut stop_rx) = oneshot::channel();

  let task = tokio::spawn(async move {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        // Fires on an explicit stop and when the handle is dropped.
        _ = &mut stop_rx => break,
        _ = ticker.tick() => {
          let removed = cache.sweep();
          if removed > 0 {
            debug!(removed, remaining = cache.len(), "Swept expired cache entries");
          }
        }
      }
    }

    debug!("Cache sweeper stopped");
  });

  SweeperHandle { stop_tx, task }
}
