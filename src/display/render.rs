//! Outbound render calls and the frame store the HTTP host reads from

use std::sync::{Arc, Mutex, PoisonError};
use serde::{Deserialize, Serialize};

use crate::state::{ColorTheme, Font, Mode};

/// Receiver of render calls; implemented by whatever draws the UI
pub trait RenderSink {
    fn render_time(&mut self, text: &str);
    fn render_progress(&mut self, fraction: f64);
    fn render_button_label(&mut self, label: &str);
    fn render_active_mode(&mut self, mode: Mode);
    fn render_theme(&mut self, font: Font, color: ColorTheme);
    fn set_window_title(&mut self, title: &str);
}

/// What the UI currently shows, as assembled from render calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedView {
    pub time: String,
    pub progress: f64,
    pub button_label: String,
    pub active_mode: Mode,
    pub font: Font,
    pub color: ColorTheme,
    pub window_title: String,
}

impl Default for RenderedView {
    fn default() -> Self {
        Self {
            time: String::new(),
            progress: 1.0,
            button_label: String::new(),
            active_mode: Mode::Pomodoro,
            font: Font::default(),
            color: ColorTheme::default(),
            window_title: String::new(),
        }
    }
}

/// Shared sink that keeps the latest rendered view for polling clients
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    view: Arc<Mutex<RenderedView>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> RenderedView {
        self.view.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut RenderedView),
    {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        updater(&mut view);
    }
}

impl RenderSink for FrameStore {
    fn render_time(&mut self, text: &str) {
        self.update(|view| view.time = text.to_string());
    }

    fn render_progress(&mut self, fraction: f64) {
        self.update(|view| view.progress = fraction);
    }

    fn render_button_label(&mut self, label: &str) {
        self.update(|view| view.button_label = label.to_string());
    }

    fn render_active_mode(&mut self, mode: Mode) {
        self.update(|view| view.active_mode = mode);
    }

    fn render_theme(&mut self, font: Font, color: ColorTheme) {
        self.update(|view| {
            view.font = font;
            view.color = color;
        });
    }

    fn set_window_title(&mut self, title: &str) {
        self.update(|view| view.window_title = title.to_string());
    }
}
