//! Display module
//!
//! This module turns timer snapshots into what the UI draws and defines the
//! render calls the host receives.

pub mod presenter;
pub mod render;

// Re-export main types
pub use presenter::{format_time, DisplayFrame, DisplayPresenter, ModeIndicator};
pub use render::{FrameStore, RenderSink, RenderedView};
