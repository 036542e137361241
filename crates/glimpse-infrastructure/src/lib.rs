//! Infrastructure layer for glimpse.
//!
//! Provides the file-backed configuration store and an in-memory
//! implementation of the engagement gateway seeded from fixtures.

pub mod config_service;
pub mod fixture;
pub mod in_memory_gateway;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use fixture::{Follow, SocialFixture, StoryLike};
pub use in_memory_gateway::{DirectMessage, InMemoryEngagementGateway};
pub use paths::GlimpsePaths;
