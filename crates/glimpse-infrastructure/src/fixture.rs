//! Seed data for the in-memory engagement store.

use chrono::{DateTime, Duration, Utc};
use glimpse_core::error::Result;
use glimpse_core::story::{AuthorProfile, MediaKind, Story, StoryId, UserId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: UserId,
    pub following_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryLike {
    pub story_id: StoryId,
    pub user_id: UserId,
}

/// A snapshot of accounts, stories and relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialFixture {
    #[serde(default)]
    pub profiles: Vec<AuthorProfile>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(default)]
    pub follows: Vec<Follow>,
    #[serde(default)]
    pub likes: Vec<StoryLike>,
}

impl SocialFixture {
    /// Reads a fixture from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// A small network around the viewer `you`, anchored at `now`.
    ///
    /// - `alice` is followed by `you` and has two stories
    /// - `bob` follows `you` and has one story
    /// - `dana` is unconnected and must never be shown
    /// - `you` has one story and one expired story
    pub fn demo(now: DateTime<Utc>) -> Self {
        let profile = |id: &str, name: &str| AuthorProfile {
            id: id.to_string(),
            display_name: name.to_string(),
            avatar_url: Some(format!("https://cdn.example/avatars/{id}.png")),
        };
        let story = |id: &str, author: &str, minutes_ago: i64, kind: MediaKind| {
            let created_at = now - Duration::minutes(minutes_ago);
            Story {
                id: id.to_string(),
                author_id: author.to_string(),
                media_url: format!("https://cdn.example/stories/{id}"),
                media_kind: kind,
                created_at,
                expires_at: created_at + Duration::hours(24),
            }
        };
        let follow = |follower: &str, following: &str| Follow {
            follower_id: follower.to_string(),
            following_id: following.to_string(),
        };

        let mut expired = story("you-old", "you", 60 * 30, MediaKind::Image);
        expired.expires_at = now - Duration::hours(6);

        Self {
            profiles: vec![
                profile("you", "You"),
                profile("alice", "Alice"),
                profile("bob", "Bob"),
                profile("dana", "Dana"),
            ],
            stories: vec![
                story("alice-1", "alice", 180, MediaKind::Image),
                story("alice-2", "alice", 20, MediaKind::Video),
                story("bob-1", "bob", 45, MediaKind::Image),
                story("you-1", "you", 90, MediaKind::Image),
                expired,
                story("dana-1", "dana", 5, MediaKind::Image),
            ],
            follows: vec![follow("you", "alice"), follow("bob", "you")],
            likes: vec![
                StoryLike {
                    story_id: "alice-1".to_string(),
                    user_id: "bob".to_string(),
                },
                StoryLike {
                    story_id: "alice-1".to_string(),
                    user_id: "you".to_string(),
                },
            ],
        }
    }
}
