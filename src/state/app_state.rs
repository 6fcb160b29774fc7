//! Main application state: the host shell around one timer

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::Config,
    display::{DisplayFrame, DisplayPresenter, FrameStore},
    services::Alarm,
    timer::TimerEngine,
};
use super::{DurationBounds, Mode, Settings, SettingsForm, TimerSnapshot};

/// Settings panel visibility and whether opening it paused the timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPanel {
    pub open: bool,
    pub paused_by_settings: bool,
}

/// Application state that wires inbound commands to the timer engine
pub struct AppState {
    /// The single timer this host drives
    pub engine: TimerEngine,
    pub presenter: DisplayPresenter,
    /// Range every submitted duration is clamped into
    pub bounds: DurationBounds,
    pub panel: Arc<Mutex<SettingsPanel>>,
    /// Latest view written by the render task
    pub frames: FrameStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state for `config`, ringing `alarm` on completion
    pub fn new(config: &Config, alarm: Arc<dyn Alarm>) -> Self {
        Self {
            engine: TimerEngine::new(config.default_settings(), alarm),
            presenter: DisplayPresenter::new(config.ring_length),
            bounds: config.duration_bounds(),
            panel: Arc::new(Mutex::new(SettingsPanel::default())),
            frames: FrameStore::new(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn lock_panel(&self) -> std::sync::MutexGuard<'_, SettingsPanel> {
        self.panel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inbound `selectMode`
    pub fn select_mode(&self, mode: Mode) -> TimerSnapshot {
        self.record_action(&format!("mode:{}", mode));
        self.engine.switch_mode(mode);
        self.engine.snapshot()
    }

    /// Inbound `toggleStartPause`
    pub fn toggle_start_pause(&self) -> TimerSnapshot {
        self.engine.toggle();
        let snapshot = self.engine.snapshot();
        self.record_action(if snapshot.is_running { "start" } else { "pause" });
        snapshot
    }

    /// Inbound `openSettingsPanel`: pauses a running timer and remembers doing so.
    /// Returns the settings the form should show.
    pub fn open_settings_panel(&self) -> Settings {
        self.record_action("settings-open");
        let mut panel = self.lock_panel();
        panel.open = true;

        // Only a pause that actually happened may be undone on close
        panel.paused_by_settings = self.engine.pause();
        if panel.paused_by_settings {
            info!("Settings panel opened, timer paused");
        } else {
            debug!("Settings panel opened");
        }

        self.engine.settings()
    }

    /// Inbound `closeSettingsPanel`: resumes the timer only if opening the panel paused it
    pub fn close_settings_panel(&self) -> TimerSnapshot {
        self.record_action("settings-close");
        let mut panel = self.lock_panel();
        panel.open = false;

        if panel.paused_by_settings {
            panel.paused_by_settings = false;
            info!("Settings panel closed, resuming timer");
            self.engine.start();
        } else {
            debug!("Settings panel closed");
        }

        self.engine.snapshot()
    }

    /// Inbound `submitSettings`: validates the form, applies it and closes the panel.
    /// An auto-paused timer is not resumed since applying resets the interval.
    pub fn submit_settings(&self, form: SettingsForm) -> TimerSnapshot {
        self.record_action("settings-submit");
        let settings = form.into_settings(&self.bounds, &self.engine.settings());

        let mut panel = self.lock_panel();
        panel.paused_by_settings = false;
        self.engine.apply_settings(settings);
        panel.open = false;

        self.engine.snapshot()
    }

    pub fn settings_panel(&self) -> SettingsPanel {
        *self.lock_panel()
    }

    /// Current settings as the settings form shows them
    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::from(&self.engine.settings())
    }

    /// Present the current timer state
    pub fn present(&self) -> DisplayFrame {
        self.presenter.present(&self.engine.snapshot())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop the timer for host shutdown
    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use clap::Parser;
    use tokio::time::sleep;

    use super::*;
    use crate::{
        services::SilentAlarm,
        state::{ColorTheme, DurationInput, Phase},
    };

    fn app_state() -> AppState {
        let config = Config::parse_from(["pomodoro-timer"]);
        AppState::new(&config, Arc::new(SilentAlarm))
    }

    #[tokio::test(start_paused = true)]
    async fn opening_settings_pauses_and_closing_resumes() {
        let state = app_state();
        state.toggle_start_pause();
        sleep(Duration::from_millis(5500)).await;

        state.open_settings_panel();
        let panel = state.settings_panel();
        assert!(panel.open);
        assert!(panel.paused_by_settings);
        assert_eq!(state.engine.snapshot().phase, Phase::Idle);

        sleep(Duration::from_secs(10)).await;
        let snapshot = state.close_settings_panel();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.remaining_seconds, 1495);
        assert_eq!(state.settings_panel(), SettingsPanel::default());
    }

    #[tokio::test(start_paused = true)]
    async fn settings_panel_does_not_restart_a_completed_timer() {
        let config = Config::parse_from(["pomodoro-timer", "--pomodoro", "1"]);
        let state = AppState::new(&config, Arc::new(SilentAlarm));
        state.toggle_start_pause();
        sleep(Duration::from_millis(60_500)).await;
        assert_eq!(state.engine.snapshot().phase, Phase::Completed);

        state.open_settings_panel();
        assert!(!state.settings_panel().paused_by_settings);

        let snapshot = state.close_settings_panel();
        assert_eq!(snapshot.phase, Phase::Completed);
        assert_eq!(snapshot.remaining_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_settings_leaves_an_idle_timer_alone() {
        let state = app_state();
        state.open_settings_panel();
        assert!(!state.settings_panel().paused_by_settings);

        let snapshot = state.close_settings_panel();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.remaining_seconds, snapshot.total_seconds);
    }

    #[tokio::test(start_paused = true)]
    async fn submitting_settings_clears_the_auto_pause() {
        let state = app_state();
        state.toggle_start_pause();
        state.open_settings_panel();

        let snapshot = state.submit_settings(SettingsForm {
            pomodoro: Some(DurationInput::Number(10.0)),
            short_break: Some(DurationInput::Text("abc".to_string())),
            long_break: Some(DurationInput::Number(75.0)),
            font: None,
            color: Some(ColorTheme::Cyan),
        });

        assert_eq!(snapshot.total_seconds, 600);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.settings.durations.short_break, 1);
        assert_eq!(snapshot.settings.durations.long_break, 60);
        assert_eq!(state.settings_panel(), SettingsPanel::default());

        // Closing afterwards must not restart the timer
        assert_eq!(state.close_settings_panel().phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_and_mode_selection_are_recorded() {
        let state = app_state();
        state.toggle_start_pause();
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
        assert_eq!(state.present().button_label, "PAUSE");

        let snapshot = state.select_mode(Mode::LongBreak);
        assert_eq!(snapshot.remaining_seconds, 900);
        assert_eq!(state.get_last_action().0.as_deref(), Some("mode:long-break"));
        assert_eq!(state.present().button_label, "START");
    }
}
