//! Story session domain module.
//!
//! This module contains the playback engine for ephemeral stories.
//!
//! # Module Structure
//!
//! - `clock`: Timer-driven progress (`SessionClock`)
//! - `ad_policy`: Interstitial cadence (`AdPolicy`)
//! - `state`: Session state, cursor and snapshots
//! - `effect`: Gateway work queued by the controller
//! - `observer`: Signals emitted to the hosting view
//! - `controller`: The state machine (`StorySessionController`)
//!
//! # Usage
//!
//! ```ignore
//! use glimpse_core::session::{StorySessionController, SessionObserver, SessionEffect};
//! ```

mod ad_policy;
mod clock;
mod controller;
mod effect;
mod observer;
mod state;

#[cfg(test)]
mod controller_test;

pub use ad_policy::AdPolicy;
pub use clock::{ClockEvent, ClockPhase, FULL_PROGRESS, SessionClock};
pub use controller::StorySessionController;
pub use effect::{LikeCommand, LikeMutation, ReplyCommand, SessionEffect};
pub use observer::{NoopObserver, Notice, SessionObserver, SessionSignal, SignalRecorder};
pub use state::{Cursor, PlaybackState, SessionId, SessionSnapshot, SessionState};
