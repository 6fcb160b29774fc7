//! Periodic tick source owned by the timer engine

use std::{sync::Weak, time::Duration};
use tokio::{
    task::AbortHandle,
    time::{interval_at, Instant},
};
use tracing::trace;

use super::engine::Shared;

/// Interval between two ticks of a running timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ownership token for one installed tick loop
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    abort: AbortHandle,
}

impl TickHandle {
    /// Identifies which loop a tick came from; ticks from older loops are dropped
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the loop; a tick already in flight is dropped by its generation check
    pub(crate) fn cancel(self) {
        trace!("Cancelling tick loop {}", self.generation);
        self.abort.abort();
    }
}

/// Spawn a loop that ticks `shared` once per period until it reports completion,
/// is cancelled, or the engine is dropped
pub(super) fn spawn_tick_loop(shared: Weak<Shared>, generation: u64) -> TickHandle {
    // First tick lands one full period after start, not immediately
    let first = Instant::now() + TICK_PERIOD;

    let task = tokio::spawn(async move {
        let mut interval = interval_at(first, TICK_PERIOD);
        loop {
            interval.tick().await;

            let Some(engine) = shared.upgrade() else {
                trace!("Engine dropped, tick loop {} exiting", generation);
                break;
            };
            if !engine.tick(generation) {
                break;
            }
        }
    });

    TickHandle {
        generation,
        abort: task.abort_handle(),
    }
}
