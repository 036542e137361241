use crate::config::SessionConfig;
use crate::error::{GlimpseError, Result};
use std::num::NonZeroU32;

/// Cadence for sponsored interstitials between stories.
///
/// The decision is a pure function of the viewed counter, so replaying the
/// same counter value always yields the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdPolicy {
    frequency: Option<NonZeroU32>,
    countdown_ms: u64,
}

impl AdPolicy {
    /// A policy showing one interstitial every `frequency` advances.
    /// A frequency of zero never shows one.
    ///
    /// # Errors
    ///
    /// A frequency of one is rejected: it would show an interstitial on the
    /// first advance and after every story.
    pub fn new(frequency: u32, countdown_ms: u64) -> Result<Self> {
        if frequency == 1 {
            return Err(GlimpseError::config(
                "ad_frequency must be 0 (disabled) or at least 2",
            ));
        }
        Ok(Self {
            frequency: NonZeroU32::new(frequency),
            countdown_ms,
        })
    }

    pub fn disabled() -> Self {
        Self {
            frequency: None,
            countdown_ms: 0,
        }
    }

    /// Policy for `config`. A config that fails validation gets no
    /// interstitials.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.ad_frequency, config.ad_countdown_ms).unwrap_or_else(|e| {
            tracing::warn!(target: "story_session", "Interstitials disabled: {}", e);
            Self::disabled()
        })
    }

    /// Whether the advance that brought the counter to `viewed_count` should
    /// be intercepted by an interstitial.
    pub fn should_intercept_next(&self, viewed_count: u64, ad_visible: bool) -> bool {
        let Some(frequency) = self.frequency else {
            return false;
        };
        !ad_visible && viewed_count > 0 && viewed_count % u64::from(frequency.get()) == 0
    }

    pub fn frequency(&self) -> Option<u32> {
        self.frequency.map(NonZeroU32::get)
    }

    /// How long an interstitial stays up before completing on its own.
    pub fn countdown_ms(&self) -> u64 {
        self.countdown_ms
    }
}

impl Default for AdPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
