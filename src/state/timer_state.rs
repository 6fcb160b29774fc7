//! Timer state structure and management

use serde::{Deserialize, Serialize};

use crate::{
    state::settings::{Mode, Settings},
    timer::TickHandle,
};

/// Where the countdown is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// Countdown state for the active interval
#[derive(Debug)]
pub struct TimerState {
    pub active_mode: Mode,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    /// Present exactly when `is_running` is set
    pub(crate) tick_handle: Option<TickHandle>,
}

impl TimerState {
    /// Create an idle timer for `mode`, filled to its full duration
    pub fn new(mode: Mode, settings: &Settings) -> Self {
        let total_seconds = settings.durations.seconds_for(mode);
        Self {
            active_mode: mode,
            total_seconds,
            remaining_seconds: total_seconds,
            is_running: false,
            tick_handle: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.remaining_seconds == 0 {
            Phase::Completed
        } else {
            Phase::Idle
        }
    }

    /// Idle with no progress made yet
    pub fn is_fresh(&self) -> bool {
        !self.is_running && self.remaining_seconds == self.total_seconds
    }

    /// Cancel and drop the tick loop, if one is installed
    pub(crate) fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            handle.cancel();
        }
        self.is_running = false;
    }
}

/// Read-only copy of the timer and its settings, published after every mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub active_mode: Mode,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub phase: Phase,
    pub settings: Settings,
}

impl TimerSnapshot {
    pub fn capture(timer: &TimerState, settings: &Settings) -> Self {
        Self {
            active_mode: timer.active_mode,
            total_seconds: timer.total_seconds,
            remaining_seconds: timer.remaining_seconds,
            is_running: timer.is_running,
            phase: timer.phase(),
            settings: *settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_fresh_and_idle() {
        let timer = TimerState::new(Mode::ShortBreak, &Settings::default());
        assert_eq!(timer.total_seconds, 300);
        assert_eq!(timer.remaining_seconds, 300);
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(timer.is_fresh());
    }

    #[test]
    fn phase_follows_running_flag_and_remaining_time() {
        let mut timer = TimerState::new(Mode::Pomodoro, &Settings::default());
        timer.remaining_seconds = 1400;
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(!timer.is_fresh());

        timer.is_running = true;
        assert_eq!(timer.phase(), Phase::Running);

        timer.is_running = false;
        timer.remaining_seconds = 0;
        assert_eq!(timer.phase(), Phase::Completed);
    }
}
