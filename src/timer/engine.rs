//! Countdown state machine: mode switching, start/pause and settings application

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::{
    services::Alarm,
    state::{Mode, Settings, TimerSnapshot, TimerState},
};
use super::tick::spawn_tick_loop;

/// Owns the timer state and the single tick loop that drives it.
///
/// Every mutation publishes a [`TimerSnapshot`] on the update channel returned by
/// [`TimerEngine::subscribe`]; that is the host's cue to re-render. Starting the
/// timer spawns a tokio task, so `start` must be called from inside a runtime.
pub struct TimerEngine {
    shared: Arc<Shared>,
}

/// State reachable from both the engine and its tick loop
pub(crate) struct Shared {
    core: Mutex<EngineCore>,
    alarm: Arc<dyn Alarm>,
    updates_tx: watch::Sender<TimerSnapshot>,
}

struct EngineCore {
    settings: Settings,
    timer: TimerState,
    next_generation: u64,
}

impl EngineCore {
    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::capture(&self.timer, &self.settings)
    }

    /// Stop any loop and refill the timer for `mode`
    fn reset_to(&mut self, mode: Mode) {
        self.timer.cancel_tick();
        let total_seconds = self.settings.durations.seconds_for(mode);
        self.timer.active_mode = mode;
        self.timer.total_seconds = total_seconds;
        self.timer.remaining_seconds = total_seconds;
    }
}

impl TimerEngine {
    /// Create an idle engine in pomodoro mode
    pub fn new(settings: Settings, alarm: Arc<dyn Alarm>) -> Self {
        let timer = TimerState::new(Mode::Pomodoro, &settings);
        let (updates_tx, _) = watch::channel(TimerSnapshot::capture(&timer, &settings));

        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(EngineCore {
                    settings,
                    timer,
                    next_generation: 0,
                }),
                alarm,
                updates_tx,
            }),
        }
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.updates_tx.subscribe()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn settings(&self) -> Settings {
        self.shared.lock().settings
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().timer.is_running
    }

    /// Select a mode: stops the countdown and refills it from the current settings
    pub fn switch_mode(&self, mode: Mode) {
        let snapshot = {
            let mut core = self.shared.lock();
            core.reset_to(mode);
            core.snapshot()
        };

        info!("Switched to {} mode ({}s)", mode, snapshot.total_seconds);
        self.shared.publish(snapshot);
    }

    /// Start counting down. A completed interval is refilled and its alarm silenced
    /// first. Does nothing while already running.
    pub fn start(&self) {
        let (snapshot, restarted) = {
            let mut core = self.shared.lock();
            if core.timer.is_running {
                debug!("Start requested while running, ignoring");
                return;
            }

            let restarted = core.timer.remaining_seconds == 0;
            if restarted {
                core.timer.remaining_seconds = core.timer.total_seconds;
            }

            // Only one loop may ever feed this timer
            core.timer.cancel_tick();
            core.next_generation += 1;
            let generation = core.next_generation;
            core.timer.tick_handle = Some(spawn_tick_loop(Arc::downgrade(&self.shared), generation));
            core.timer.is_running = true;

            (core.snapshot(), restarted)
        };

        if restarted {
            self.shared.alarm.stop();
        }
        info!(
            "Timer started in {} mode with {}s remaining",
            snapshot.active_mode, snapshot.remaining_seconds
        );
        self.shared.publish(snapshot);
    }

    /// Pause a running countdown, keeping the remaining time.
    /// Returns whether the timer was running and is now paused.
    pub fn pause(&self) -> bool {
        let snapshot = {
            let mut core = self.shared.lock();
            if !core.timer.is_running {
                debug!("Pause requested while not running, ignoring");
                return false;
            }
            core.timer.cancel_tick();
            core.snapshot()
        };

        self.shared.alarm.stop();
        info!("Timer paused with {}s remaining", snapshot.remaining_seconds);
        self.shared.publish(snapshot);
        true
    }

    /// Pause when running, start otherwise
    pub fn toggle(&self) {
        if !self.pause() {
            self.start();
        }
    }

    /// Replace the settings and refill the active mode from them
    pub fn apply_settings(&self, settings: Settings) {
        let snapshot = {
            let mut core = self.shared.lock();
            core.settings = settings;
            let mode = core.timer.active_mode;
            core.reset_to(mode);
            core.snapshot()
        };

        info!(
            "Settings applied: pomodoro={}min short-break={}min long-break={}min theme=\"{}\"",
            settings.durations.pomodoro,
            settings.durations.short_break,
            settings.durations.long_break,
            settings.theme_class()
        );
        self.shared.publish(snapshot);
    }

    /// Tear down the tick loop and silence the alarm
    pub fn shutdown(&self) {
        let snapshot = {
            let mut core = self.shared.lock();
            core.timer.cancel_tick();
            core.snapshot()
        };

        self.shared.alarm.stop();
        info!("Timer engine shut down");
        self.shared.publish(snapshot);
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.shared.lock().timer.cancel_tick();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        self.updates_tx.send_replace(snapshot);
    }

    /// Apply one tick from loop `generation`. Returns whether the loop should keep going.
    pub(super) fn tick(&self, generation: u64) -> bool {
        let (snapshot, completed) = {
            let mut core = self.lock();
            match core.timer.tick_handle {
                Some(ref handle) if handle.generation() == generation => {}
                _ => {
                    warn!("Dropping tick from cancelled loop {}", generation);
                    return false;
                }
            }

            if core.timer.remaining_seconds > 0 {
                core.timer.remaining_seconds -= 1;
            }
            trace!("Tick: {}s remaining", core.timer.remaining_seconds);

            let completed = core.timer.remaining_seconds == 0;
            if completed {
                // The loop ends on its own once this tick returns
                core.timer.tick_handle = None;
                core.timer.is_running = false;
            }
            (core.snapshot(), completed)
        };

        if completed {
            info!("{} interval complete", snapshot.active_mode);
            self.alarm.play();
        }
        self.publish(snapshot);
        !completed
    }
}
