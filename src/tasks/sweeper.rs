//! Periodic Sweeper
//!
//! Shared lifecycle plumbing for background maintenance: a dedicated
//! tokio task driven by an interval timer, with a shutdown signal and a
//! join on stop. Stopping is an acknowledgement, not fire-and-forget;
//! after `stop()` returns the task has observably exited and will never
//! tick again.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

// == Sweeper ==
/// Handle to one periodic background task.
#[derive(Debug)]
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
    name: &'static str,
}

impl Sweeper {
    // == Spawn ==
    /// Spawns a task that invokes `tick` every `interval`.
    ///
    /// The first invocation happens one full interval after spawning.
    /// Missed ticks are delayed rather than bursted. `interval` must be
    /// non-zero; the interval timer panics on a zero period, so owners
    /// validate before spawning.
    ///
    /// # Arguments
    /// * `name` - Label used in log lines
    /// * `interval` - Time between invocations
    /// * `tick` - Maintenance closure to run on each tick
    pub fn spawn<F>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, mut signal) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!("{} sweep started, interval {:?}", name, interval);

            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval fires immediately; swallow that first tick so the
            // initial sweep happens one full interval in.
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = timer.tick() => tick(),
                    _ = signal.changed() => break,
                }
            }

            debug!("{} sweep exited", name);
        });

        Self {
            shutdown,
            handle,
            name,
        }
    }

    // == Stop ==
    /// Signals the task to exit and waits until it has.
    ///
    /// Consumes the handle, so a sweeper cannot be stopped twice; owners
    /// keep it in an `Option` and `take()` it for idempotent shutdown.
    pub async fn stop(self) {
        // The receiver may already be gone if the task panicked; joining
        // below still completes either way.
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
        info!("{} sweep stopped", self.name);
    }
}
