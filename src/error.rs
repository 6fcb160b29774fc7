//! Error types shared by the host boundary

use thiserror::Error;

/// Errors raised where host input crosses into the timer core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PomodoroError {
    /// A mode identifier that names none of the three interval modes
    #[error("unknown timer mode: {0}")]
    InvalidModeKey(String),

    /// A duration input outside the accepted range; reported, then clamped
    #[error("duration input {input:?} is outside {min}..={max} minutes")]
    InvalidDuration { input: String, min: u32, max: u32 },
}
