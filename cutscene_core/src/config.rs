//! Tunables for the introduction sequence.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Floor applied to every timed duration so each routine terminates.
pub const MIN_TIMED_SECONDS: f32 = 0.01;

/// Floor for actor travel (entrance and exit).
const MIN_TRAVEL_SECONDS: f32 = 0.25;

/// Floor for the capture pulse.
const MIN_CAPTURE_SECONDS: f32 = 0.1;

/// Exit travel is a fraction of the entrance travel.
const EXIT_TRAVEL_FACTOR: f32 = 0.75;

/// Configuration for an [`IntroSequencer`](crate::IntroSequencer).
///
/// Values are taken as authored; the accessor methods apply the clamping the
/// sequencer actually uses, so a zero or negative duration never stalls a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// How close the player must be to the anchor for the prompt to show.
    pub interact_radius: f32,

    /// Key name shown in the prompt and continue hint.
    pub talk_key: String,

    /// Where the antagonist appears, relative to the anchor.
    pub villain_spawn_offset: Vec2,

    /// Where the antagonist leaves to, relative to the anchor.
    pub villain_exit_offset: Vec2,

    pub villain_travel_seconds: f32,
    pub kidnapping_delay_seconds: f32,

    /// Wait after the final beat before the player can move again.
    pub resume_control_delay: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            interact_radius: 1.75,
            talk_key: "T".to_string(),
            villain_spawn_offset: Vec2::new(-3.0, 3.25),
            villain_exit_offset: Vec2::new(6.0, 4.0),
            villain_travel_seconds: 2.0,
            kidnapping_delay_seconds: 0.9,
            resume_control_delay: 1.5,
        }
    }
}

impl SequencerConfig {
    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Interaction radius, never negative.
    pub fn interact_radius(&self) -> f32 {
        self.interact_radius.max(0.0)
    }

    /// Duration of the antagonist's entrance.
    pub fn summon_seconds(&self) -> f32 {
        self.villain_travel_seconds.max(MIN_TRAVEL_SECONDS)
    }

    /// Duration of the antagonist's exit.
    pub fn dismiss_seconds(&self) -> f32 {
        (self.villain_travel_seconds * EXIT_TRAVEL_FACTOR).max(MIN_TRAVEL_SECONDS)
    }

    /// Duration of the capture pulse before the target is concealed.
    pub fn capture_seconds(&self) -> f32 {
        self.kidnapping_delay_seconds.max(MIN_CAPTURE_SECONDS)
    }

    pub fn resume_delay_seconds(&self) -> f32 {
        self.resume_control_delay.max(MIN_TIMED_SECONDS)
    }

    /// Text of the proximity prompt, e.g. `Press T to talk`.
    pub fn prompt_label(&self) -> String {
        format!("Press {} to talk", self.talk_key.to_uppercase())
    }

    /// Text of the continue hint, e.g. `[T] Continue`.
    pub fn continue_hint(&self) -> String {
        format!("[{}] Continue", self.talk_key.to_uppercase())
    }
}
