//! Side effects the controller asks its host to perform.
//!
//! The controller never awaits the gateway. It queues a [`SessionEffect`],
//! the runtime executes it, and the outcome comes back tagged with the
//! session id it was issued for so late answers can be dropped.

use super::state::SessionId;
use crate::engagement::LikeEntry;
use crate::story::{StoryId, UserId};
use serde::{Deserialize, Serialize};

/// A reversible change to a story's like entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeMutation {
    Like,
    Unlike,
}

impl LikeMutation {
    /// The mutation that toggles `entry`.
    pub fn toggle_of(entry: LikeEntry) -> Self {
        if entry.liked { Self::Unlike } else { Self::Like }
    }

    pub fn apply(self, entry: &mut LikeEntry) {
        match self {
            Self::Like => {
                entry.liked = true;
                entry.count = entry.count.saturating_add(1);
            }
            Self::Unlike => {
                entry.liked = false;
                entry.count = entry.count.saturating_sub(1);
            }
        }
    }

    /// Applies the mutation to a store-confirmed entry. Writes are
    /// idempotent, so an entry already holding the target flag is unchanged.
    pub fn confirm(self, entry: &mut LikeEntry) {
        if entry.liked != self.target() {
            self.apply(entry);
        }
    }

    /// The like flag this mutation writes to the store.
    pub fn target(self) -> bool {
        matches!(self, Self::Like)
    }
}

/// An optimistic like change awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCommand {
    pub session_id: SessionId,
    pub story_id: StoryId,
    pub viewer_id: UserId,
    pub mutation: LikeMutation,
}

/// A validated reply to a story author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyCommand {
    pub session_id: SessionId,
    pub story_id: StoryId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEffect {
    /// Fetch like flag and count for a story visited for the first time.
    LoadLikeState {
        session_id: SessionId,
        story_id: StoryId,
        viewer_id: UserId,
    },
    WriteLike(LikeCommand),
    SendReply(ReplyCommand),
}
