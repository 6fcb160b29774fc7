//! Timer settings, interval modes and the duration validation boundary

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PomodoroError;

/// The three interval modes a timer can count down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pomodoro, Mode::ShortBreak, Mode::LongBreak];

    /// Identifier used by the UI for the mode's button
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Pomodoro => "pomodoro",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PomodoroError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "pomodoro" => Ok(Mode::Pomodoro),
            "short-break" | "shortBreak" => Ok(Mode::ShortBreak),
            "long-break" | "longBreak" => Ok(Mode::LongBreak),
            other => Err(PomodoroError::InvalidModeKey(other.to_string())),
        }
    }
}

/// Font families offered by the theme picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Kumbh,
    Roboto,
    Space,
}

impl Font {
    pub fn as_str(&self) -> &'static str {
        match self {
            Font::Kumbh => "kumbh",
            Font::Roboto => "roboto",
            Font::Space => "space",
        }
    }
}

/// Accent colours offered by the theme picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Red,
    Cyan,
    Purple,
}

impl ColorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Red => "red",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Purple => "purple",
        }
    }
}

/// Longest interval whose length in seconds still fits a `u32`
pub const MAX_MINUTES: u32 = u32::MAX / 60;

/// Interval lengths in minutes, one per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Durations {
    pub pomodoro: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Durations {
    /// Minutes configured for `mode`, within `1..=MAX_MINUTES`
    pub fn minutes_for(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Pomodoro => self.pomodoro,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        };
        minutes.clamp(1, MAX_MINUTES)
    }

    pub fn seconds_for(&self, mode: Mode) -> u32 {
        self.minutes_for(mode).saturating_mul(60)
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            pomodoro: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

/// Everything the user can change from the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub durations: Durations,
    pub font: Font,
    pub color: ColorTheme,
}

impl Settings {
    /// CSS class list applied to the page body for the chosen theme
    pub fn theme_class(&self) -> String {
        format!("font-{} theme-{}", self.font.as_str(), self.color.as_str())
    }
}

/// A raw duration field as submitted by the settings form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl DurationInput {
    /// Integer the input reads as, the way a lenient form parser sees it
    fn as_integer(&self) -> Option<i64> {
        match self {
            DurationInput::Integer(n) => Some(*n),
            DurationInput::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            DurationInput::Number(_) => None,
            DurationInput::Text(text) => leading_integer(text),
        }
    }
}

impl fmt::Display for DurationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationInput::Integer(n) => write!(f, "{}", n),
            DurationInput::Number(n) => write!(f, "{}", n),
            DurationInput::Text(text) => f.write_str(text),
        }
    }
}

/// Parse the integer prefix of `text` ("12min" reads as 12, "abc" as nothing).
/// Digit runs too long for an `i64` saturate.
fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Accepted range for every duration field, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min: u32,
    pub max: u32,
}

impl DurationBounds {
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.clamp(1, MAX_MINUTES);
        Self { min, max: max.clamp(min, MAX_MINUTES) }
    }

    /// Check an input without correcting it
    pub fn validate(&self, input: &DurationInput) -> Result<u32, PomodoroError> {
        match input.as_integer() {
            Some(value) if value >= self.min as i64 && value <= self.max as i64 => Ok(value as u32),
            _ => Err(PomodoroError::InvalidDuration {
                input: input.to_string(),
                min: self.min,
                max: self.max,
            }),
        }
    }

    /// Bring an input into range: non-numeric and too-small inputs become `min`,
    /// too-large inputs become `max`
    pub fn clamp(&self, input: &DurationInput) -> u32 {
        match self.validate(input) {
            Ok(minutes) => minutes,
            Err(e) => {
                debug!("Clamping settings input: {}", e);
                match input.as_integer() {
                    Some(value) if value > self.max as i64 => self.max,
                    _ => self.min,
                }
            }
        }
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self { min: 1, max: 60 }
    }
}

/// A settings submission before it has passed the validation boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    pub pomodoro: Option<DurationInput>,
    pub short_break: Option<DurationInput>,
    pub long_break: Option<DurationInput>,
    pub font: Option<Font>,
    pub color: Option<ColorTheme>,
}

impl SettingsForm {
    /// Produce validated settings; unselected font or colour keeps the current choice
    pub fn into_settings(self, bounds: &DurationBounds, current: &Settings) -> Settings {
        let clamp = |input: Option<DurationInput>| {
            input.map(|i| bounds.clamp(&i)).unwrap_or(bounds.min)
        };

        Settings {
            durations: Durations {
                pomodoro: clamp(self.pomodoro),
                short_break: clamp(self.short_break),
                long_break: clamp(self.long_break),
            },
            font: self.font.unwrap_or(current.font),
            color: self.color.unwrap_or(current.color),
        }
    }
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> Self {
        let field = |minutes: u32| Some(DurationInput::Integer(minutes as i64));
        Self {
            pomodoro: field(settings.durations.pomodoro),
            short_break: field(settings.durations.short_break),
            long_break: field(settings.durations.long_break),
            font: Some(settings.font),
            color: Some(settings.color),
        }
    }
}
