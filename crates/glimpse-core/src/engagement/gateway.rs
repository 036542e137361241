use crate::story::StoryGroup;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier the store assigns to a delivered direct message.
pub type MessageId = String;

/// Failure reported by the engagement store.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("rejected by store: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Like state of one story as seen by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEntry {
    pub liked: bool,
    pub count: u64,
}

/// Read/write access to story likes, direct messages and story groups.
///
/// Implementations are shared across tasks and must tolerate concurrent
/// calls; the session engine issues them fire-and-forget and never blocks
/// playback on the result.
#[async_trait]
pub trait EngagementGateway: Send + Sync {
    /// Whether `viewer_id` currently likes `story_id`.
    async fn fetch_like_state(&self, story_id: &str, viewer_id: &str) -> GatewayResult<bool>;

    /// Total number of likes on `story_id`.
    async fn fetch_like_count(&self, story_id: &str) -> GatewayResult<u64>;

    /// Sets or clears the viewer's like on a story.
    async fn set_liked(&self, story_id: &str, viewer_id: &str, liked: bool) -> GatewayResult<()>;

    /// Delivers a direct message and returns its id.
    async fn send_direct_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        text: &str,
    ) -> GatewayResult<MessageId>;

    /// Story groups the viewer may watch, already filtered for expiry and
    /// connectedness and ordered for display.
    async fn fetch_eligible_story_groups(&self, viewer_id: &str) -> GatewayResult<Vec<StoryGroup>>;
}
