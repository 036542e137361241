//! Story domain module.
//!
//! Value types for stories and per-author story groups, plus the pure
//! grouping and ordering helpers used when a session is assembled.
//!
//! # Module Structure
//!
//! - `model`: `Story`, `MediaKind`, `AuthorProfile`, `StoryGroup`
//! - `grouping`: `group_by_author`, `order_groups`

mod grouping;
mod model;

pub use grouping::{group_by_author, order_groups};
pub use model::{AuthorProfile, MediaKind, Story, StoryGroup, StoryId, UserId};
