use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a story in the external store.
pub type StoryId = String;
/// Identifier of an account in the external store.
pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A single piece of ephemeral media. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub author_id: UserId,
    pub media_url: String,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Story {
    /// Whether the story may still be shown at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl AuthorProfile {
    /// Profile used when the store has no profile row for an author.
    pub fn placeholder(id: impl Into<UserId>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            avatar_url: None,
        }
    }
}

/// One author's currently eligible stories, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryGroup {
    pub author: AuthorProfile,
    pub stories: Vec<Story>,
}

impl StoryGroup {
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    /// Creation time of the newest story in the group.
    pub fn latest_created_at(&self) -> Option<DateTime<Utc>> {
        self.stories.iter().map(|s| s.created_at).max()
    }

    pub fn contains(&self, story_id: &str) -> bool {
        self.stories.iter().any(|s| s.id == story_id)
    }
}
