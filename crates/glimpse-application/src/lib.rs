//! Application layer for glimpse.
//!
//! Runs story sessions on tokio: each open session gets its own event loop
//! that owns the [`StorySessionController`](glimpse_core::session::StorySessionController),
//! a ticker feeding it clock ticks, and background tasks executing gateway
//! round trips.

pub mod session;
pub mod story_session_usecase;

pub use session::StorySessionHandle;
pub use story_session_usecase::StorySessionService;
