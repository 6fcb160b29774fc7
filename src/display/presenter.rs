//! Derives what the UI shows from a timer snapshot

use serde::{Deserialize, Serialize};

use crate::state::{ColorTheme, Font, Mode, Phase, TimerSnapshot};
use super::render::RenderSink;

/// Circumference of the progress ring in the reference artwork
pub const DEFAULT_RING_LENGTH: f64 = 880.0;

/// Appended to the time in the window title
pub const TITLE_SUFFIX: &str = " - Pomodoro";

pub const LABEL_START: &str = "START";
pub const LABEL_PAUSE: &str = "PAUSE";
pub const LABEL_RESTART: &str = "RESTART";

/// One mode button and whether it is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeIndicator {
    pub mode: Mode,
    pub active: bool,
}

/// Everything needed to draw one state of the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFrame {
    pub time_text: String,
    pub title: String,
    pub progress_fraction: f64,
    pub ring_offset: f64,
    pub button_label: String,
    pub active_mode: Mode,
    pub modes: Vec<ModeIndicator>,
    pub font: Font,
    pub color: ColorTheme,
    pub theme_class: String,
}

impl DisplayFrame {
    /// Push this frame through every outbound render call
    pub fn render_to<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        sink.render_time(&self.time_text);
        sink.render_progress(self.progress_fraction);
        sink.render_button_label(&self.button_label);
        sink.render_active_mode(self.active_mode);
        sink.render_theme(self.font, self.color);
        sink.set_window_title(&self.title);
    }
}

/// Pure mapping from [`TimerSnapshot`] to [`DisplayFrame`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPresenter {
    ring_length: f64,
}

impl DisplayPresenter {
    pub fn new(ring_length: f64) -> Self {
        Self { ring_length }
    }

    pub fn ring_length(&self) -> f64 {
        self.ring_length
    }

    pub fn present(&self, snapshot: &TimerSnapshot) -> DisplayFrame {
        let time_text = format_time(snapshot.remaining_seconds);
        let progress_fraction = progress_fraction(snapshot.remaining_seconds, snapshot.total_seconds);

        DisplayFrame {
            title: format!("{}{}", time_text, TITLE_SUFFIX),
            time_text,
            progress_fraction,
            ring_offset: self.ring_length * (1.0 - progress_fraction),
            button_label: button_label(snapshot.phase).to_string(),
            active_mode: snapshot.active_mode,
            modes: Mode::ALL
                .iter()
                .map(|&mode| ModeIndicator {
                    mode,
                    active: mode == snapshot.active_mode,
                })
                .collect(),
            font: snapshot.settings.font,
            color: snapshot.settings.color,
            theme_class: snapshot.settings.theme_class(),
        }
    }
}

impl Default for DisplayPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_RING_LENGTH)
    }
}

/// `M:SS`, minutes unpadded
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Share of the interval still left, 0 when there is no interval at all
pub fn progress_fraction(remaining_seconds: u32, total_seconds: u32) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    remaining_seconds as f64 / total_seconds as f64
}

pub fn button_label(phase: Phase) -> &'static str {
    // Idle reads START whether or not the interval has been started before
    match phase {
        Phase::Idle => LABEL_START,
        Phase::Running => LABEL_PAUSE,
        Phase::Completed => LABEL_RESTART,
    }
}
