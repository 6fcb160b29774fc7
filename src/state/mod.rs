//! State management module
//!
//! This module contains the settings, timer state and host application state.

pub mod settings;
pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use settings::{
    ColorTheme, DurationBounds, DurationInput, Durations, Font, Mode, Settings, SettingsForm,
};
pub use app_state::{AppState, SettingsPanel};
pub use timer_state::{Phase, TimerSnapshot, TimerState};
