//! Timer engine module
//!
//! This module owns the countdown state machine and its one-second tick loop.

pub mod engine;
pub mod tick;

// Re-export main types
pub use engine::TimerEngine;
pub use tick::{TickHandle, TICK_PERIOD};
