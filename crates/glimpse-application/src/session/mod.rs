//! Session runtime.
//!
//! - `command`: messages from the handle and from background tasks
//! - `ticker`: interval task driving the session clock
//! - `runtime`: the per-session event loop
//! - `handle`: the host-facing input surface

mod command;
mod handle;
mod runtime;
mod ticker;

pub use handle::StorySessionHandle;
pub(crate) use runtime::SessionRuntime;
