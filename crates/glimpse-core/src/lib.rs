//! Domain layer for glimpse, an ephemeral story session engine.
//!
//! Stories are grouped per author and played back one after another. The
//! [`session::StorySessionController`] drives autoplay, hold-to-pause,
//! cross-author navigation and sponsored interstitials. Persistence is
//! delegated to an [`engagement::EngagementGateway`].

pub mod auth;
pub mod config;
pub mod engagement;
pub mod error;
pub mod session;
pub mod story;

pub use auth::AuthContext;
pub use error::{GlimpseError, Result};
