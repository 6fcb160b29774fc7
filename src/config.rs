//! Configuration and CLI argument handling

use std::sync::Arc;
use clap::Parser;

use crate::{
    display::presenter::DEFAULT_RING_LENGTH,
    services::{Alarm, AlarmConfig, CommandAlarm, SilentAlarm},
    state::{DurationBounds, Durations, Settings},
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "pomodoro-timer")]
#[command(about = "A Pomodoro timer engine served to a browser UI over HTTP")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default pomodoro length in minutes
    #[arg(long, default_value = "25")]
    pub pomodoro: u32,

    /// Default short break length in minutes
    #[arg(long, default_value = "5")]
    pub short_break: u32,

    /// Default long break length in minutes
    #[arg(long, default_value = "15")]
    pub long_break: u32,

    /// Smallest duration the settings form accepts, in minutes
    #[arg(long, default_value = "1")]
    pub min_minutes: u32,

    /// Largest duration the settings form accepts, in minutes
    #[arg(long, default_value = "60")]
    pub max_minutes: u32,

    /// Circumference of the progress ring in UI units
    #[arg(long, default_value_t = DEFAULT_RING_LENGTH)]
    pub ring_length: f64,

    /// Program that plays the alarm sound (alarm is only logged when unset)
    #[arg(long)]
    pub alarm_command: Option<String>,

    /// Argument passed to the alarm program; repeat for several
    #[arg(long = "alarm-arg", allow_hyphen_values = true)]
    pub alarm_args: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn duration_bounds(&self) -> DurationBounds {
        DurationBounds::new(self.min_minutes, self.max_minutes)
    }

    /// Startup settings, with each default pulled into the accepted range
    pub fn default_settings(&self) -> Settings {
        let bounds = self.duration_bounds();
        let clamp = |minutes: u32| minutes.clamp(bounds.min, bounds.max);

        Settings {
            durations: Durations {
                pomodoro: clamp(self.pomodoro),
                short_break: clamp(self.short_break),
                long_break: clamp(self.long_break),
            },
            ..Settings::default()
        }
    }

    /// Build the alarm described by the alarm flags
    pub fn alarm(&self) -> Arc<dyn Alarm> {
        match &self.alarm_command {
            Some(program) => Arc::new(CommandAlarm::new(AlarmConfig::new(
                program.clone(),
                self.alarm_args.clone(),
            ))),
            None => Arc::new(SilentAlarm),
        }
    }
}
