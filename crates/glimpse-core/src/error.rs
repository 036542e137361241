//! Error types for the story session engine.

use crate::engagement::GatewayError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a story reply was refused before reaching the gateway.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyRejection {
    /// The reply text was empty or whitespace only.
    #[error("reply text is empty")]
    Empty,
    /// The viewer tried to reply to their own story.
    #[error("cannot reply to your own story")]
    OwnStory,
}

/// A shared error type for the whole glimpse workspace.
///
/// None of these are fatal to a host. Session-level variants are either
/// silently refused (`EmptySession`, `StaleEvent`) or recovered by rolling
/// back optimistic state.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GlimpseError {
    /// A session was requested with no eligible story groups or an
    /// out-of-range cursor.
    #[error("No eligible stories to open a session with")]
    EmptySession,

    /// An input arrived while no session was open.
    #[error("No active story session")]
    NoActiveSession,

    /// A completion or response referenced a story that is no longer current.
    #[error("Stale event discarded")]
    StaleEvent,

    /// A like toggle arrived before the story's like state was loaded.
    #[error("Like state for story '{story_id}' has not been loaded yet")]
    LikeStateUnavailable { story_id: String },

    /// A reply was refused locally.
    #[error("Reply rejected: {0}")]
    ReplyRejected(ReplyRejection),

    /// The referenced story is not part of the open session.
    #[error("Story '{story_id}' is not part of this session")]
    StoryNotFound { story_id: String },

    /// The engagement store failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The session's event loop has already shut down.
    #[error("Story session is closed")]
    SessionClosed,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GlimpseError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn like_state_unavailable(story_id: impl Into<String>) -> Self {
        Self::LikeStateUnavailable {
            story_id: story_id.into(),
        }
    }

    pub fn story_not_found(story_id: impl Into<String>) -> Self {
        Self::StoryNotFound {
            story_id: story_id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    pub fn is_reply_rejected(&self) -> bool {
        matches!(self, Self::ReplyRejected(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Errors the controller swallows without telling the viewer.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::EmptySession | Self::StaleEvent | Self::NoActiveSession
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GlimpseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GlimpseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GlimpseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GlimpseError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for GlimpseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, GlimpseError>`.
pub type Result<T> = std::result::Result<T, GlimpseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_converts() {
        let err: GlimpseError = GatewayError::Network("timeout".to_string()).into();
        assert!(err.is_gateway());
        assert_eq!(err.to_string(), "Gateway error: network error: timeout");
    }

    #[test]
    fn test_silent_errors() {
        assert!(GlimpseError::EmptySession.is_silent());
        assert!(GlimpseError::StaleEvent.is_silent());
        assert!(!GlimpseError::ReplyRejected(ReplyRejection::Empty).is_silent());
    }

    #[test]
    fn test_reply_rejection_message() {
        let err = GlimpseError::ReplyRejected(ReplyRejection::OwnStory);
        assert_eq!(err.to_string(), "Reply rejected: cannot reply to your own story");
    }
}
