use crate::error::{GlimpseError, Result};
use serde::{Deserialize, Serialize};

/// Default time a single story stays on screen.
pub const DEFAULT_STORY_DURATION_MS: u64 = 5_000;
/// Default clock resolution.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
/// Default number of story advances between interstitials.
pub const DEFAULT_AD_FREQUENCY: u32 = 3;
/// Default time an interstitial stays up before it completes on its own.
pub const DEFAULT_AD_COUNTDOWN_MS: u64 = 5_000;

/// Playback constants for a story session.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default = "default_story_duration_ms")]
    pub story_duration_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Show one interstitial every N story advances. `0` disables ads.
    #[serde(default = "default_ad_frequency")]
    pub ad_frequency: u32,
    #[serde(default = "default_ad_countdown_ms")]
    pub ad_countdown_ms: u64,
}

fn default_story_duration_ms() -> u64 {
    DEFAULT_STORY_DURATION_MS
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_ad_frequency() -> u32 {
    DEFAULT_AD_FREQUENCY
}

fn default_ad_countdown_ms() -> u64 {
    DEFAULT_AD_COUNTDOWN_MS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            story_duration_ms: DEFAULT_STORY_DURATION_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            ad_frequency: DEFAULT_AD_FREQUENCY,
            ad_countdown_ms: DEFAULT_AD_COUNTDOWN_MS,
        }
    }
}

impl SessionConfig {
    /// Rejects values the clock and ad policy cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(GlimpseError::config("tick_interval_ms must be greater than 0"));
        }
        if self.story_duration_ms < self.tick_interval_ms {
            return Err(GlimpseError::config(format!(
                "story_duration_ms ({}) must be at least tick_interval_ms ({})",
                self.story_duration_ms, self.tick_interval_ms
            )));
        }
        if self.ad_frequency == 1 {
            return Err(GlimpseError::config(
                "ad_frequency must be 0 (disabled) or at least 2",
            ));
        }
        Ok(())
    }

    /// Number of clock ticks that make up one story.
    pub fn ticks_per_story(&self) -> u64 {
        self.story_duration_ms.div_ceil(self.tick_interval_ms.max(1))
    }
}

/// Logging preferences read by the binaries.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl RootConfig {
    pub fn validate(&self) -> Result<()> {
        self.session.validate()
    }
}
