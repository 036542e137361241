//! Scripted gestures for non-interactive playback.
//!
//! A script is a comma separated list of steps:
//!
//! | Step        | Gesture                            |
//! |-------------|------------------------------------|
//! | `f`         | tap forward                        |
//! | `b`         | tap backward                       |
//! | `h`         | hold start                         |
//! | `r`         | hold end (release)                 |
//! | `a`         | skip the interstitial              |
//! | `l`         | toggle like on the current story   |
//! | `m:<text>`  | reply to the current story         |
//! | `s`         | print a snapshot                   |
//! | `c`         | close                              |
//! | `w<ms>`     | wait                               |

use anyhow::{Result, anyhow};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    TapForward,
    TapBackward,
    HoldStart,
    HoldEnd,
    AdCompleted,
    ToggleLike,
    Reply(String),
    Snapshot,
    Close,
    Wait(Duration),
}

impl FromStr for ScriptStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let step = s.trim();
        if let Some(text) = step.strip_prefix("m:") {
            return Ok(Self::Reply(text.to_string()));
        }
        if let Some(ms) = step.strip_prefix('w') {
            let ms: u64 = ms
                .parse()
                .map_err(|_| anyhow!("Invalid wait step '{}'", step))?;
            return Ok(Self::Wait(Duration::from_millis(ms)));
        }

        match step {
            "f" => Ok(Self::TapForward),
            "b" => Ok(Self::TapBackward),
            "h" => Ok(Self::HoldStart),
            "r" => Ok(Self::HoldEnd),
            "a" => Ok(Self::AdCompleted),
            "l" => Ok(Self::ToggleLike),
            "s" => Ok(Self::Snapshot),
            "c" => Ok(Self::Close),
            other => Err(anyhow!("Unknown script step '{}'", other)),
        }
    }
}

pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}
