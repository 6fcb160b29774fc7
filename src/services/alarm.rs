//! Alarm playback through an external audio player

use std::{
    process::Stdio,
    sync::{Mutex, PoisonError},
};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Something that can ring when an interval completes.
///
/// Both calls must be idempotent: playing twice keeps one alarm going, stopping
/// a silent alarm does nothing.
pub trait Alarm: Send + Sync {
    fn play(&self);
    fn stop(&self);
}

/// Command line used to play the alarm sound
#[derive(Debug, Clone)]
pub struct AlarmConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl AlarmConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Plays the alarm by running an external player such as `paplay alarm.oga`
#[derive(Debug)]
pub struct CommandAlarm {
    config: AlarmConfig,
    player: Mutex<Option<Child>>,
}

impl CommandAlarm {
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            player: Mutex::new(None),
        }
    }

    fn spawn_player(&self) -> Result<Child, String> {
        Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.config.program, e))
    }
}

impl Alarm for CommandAlarm {
    fn play(&self) {
        let mut player = self.player.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(child) = player.as_mut() {
            match child.try_wait() {
                Ok(None) => {
                    debug!("Alarm already playing");
                    return;
                }
                Ok(Some(status)) => debug!("Previous alarm player exited with {}", status),
                Err(e) => warn!("Failed to poll alarm player: {}", e),
            }
        }

        match self.spawn_player() {
            Ok(child) => {
                info!("Playing alarm with {}", self.config.program);
                *player = Some(child);
            }
            Err(e) => {
                warn!("Alarm playback failed: {}", e);
                *player = None;
            }
        }
    }

    fn stop(&self) {
        let mut player = self.player.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(mut child) = player.take() {
            if let Err(e) = child.start_kill() {
                debug!("Alarm player already gone: {}", e);
            } else {
                info!("Alarm stopped");
            }
        }
    }
}

/// Alarm for hosts without audio; completion only shows up in the log
#[derive(Debug, Default)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn play(&self) {
        info!("Alarm: interval complete");
    }

    fn stop(&self) {
        debug!("Alarm: stop requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_player_is_logged_not_fatal() {
        let alarm = CommandAlarm::new(AlarmConfig::new("definitely-not-an-audio-player", vec![]));
        alarm.play();
        assert!(alarm.player.lock().unwrap().is_none());
        alarm.stop();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn play_keeps_a_single_player_and_stop_kills_it() {
        let alarm = CommandAlarm::new(AlarmConfig::new("sleep", vec!["30".to_string()]));
        alarm.play();
        let first = alarm.player.lock().unwrap().as_ref().and_then(|c| c.id());
        assert!(first.is_some());

        alarm.play();
        let second = alarm.player.lock().unwrap().as_ref().and_then(|c| c.id());
        assert_eq!(first, second);

        alarm.stop();
        assert!(alarm.player.lock().unwrap().is_none());
        alarm.stop();
    }
}
