//! External collaborators module
//!
//! This module contains the alarm capability the timer rings on completion.

pub mod alarm;

// Re-export main types
pub use alarm::{Alarm, AlarmConfig, CommandAlarm, SilentAlarm};
