//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod render_task;

// Re-export main functions
pub use render_task::render_task;
