//! Pomodoro Timer - a Pomodoro countdown engine behind a small HTTP host
//!
//! This library provides the timer state machine with its one-second tick loop,
//! the presenter that turns timer state into what the UI draws, and the HTTP
//! shell a browser UI drives it through.

pub mod config;
pub mod error;
pub mod state;
pub mod timer;
pub mod display;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::PomodoroError;
pub use state::AppState;
pub use timer::TimerEngine;
pub use display::DisplayPresenter;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
