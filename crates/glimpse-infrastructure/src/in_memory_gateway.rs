//! In-process implementation of the engagement store.

use crate::fixture::{Follow, SocialFixture};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glimpse_core::engagement::{EngagementGateway, GatewayError, GatewayResult, MessageId};
use glimpse_core::story::{
    AuthorProfile, Story, StoryGroup, StoryId, UserId, group_by_author, order_groups,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreData {
    profiles: HashMap<UserId, AuthorProfile>,
    stories: Vec<Story>,
    follows: HashSet<Follow>,
    likes: HashSet<(StoryId, UserId)>,
    messages: Vec<DirectMessage>,
}

impl StoreData {
    fn has_story(&self, story_id: &str) -> bool {
        self.stories.iter().any(|s| s.id == story_id)
    }

    /// The viewer, the accounts they follow, and the accounts following them.
    fn connected_authors(&self, viewer_id: &str) -> BTreeSet<UserId> {
        let mut connected = BTreeSet::from([viewer_id.to_string()]);
        for follow in &self.follows {
            if follow.follower_id == viewer_id {
                connected.insert(follow.following_id.clone());
            }
            if follow.following_id == viewer_id {
                connected.insert(follow.follower_id.clone());
            }
        }
        connected
    }
}

/// An [`EngagementGateway`] holding profiles, stories, follows, likes and
/// direct messages in memory.
///
/// Cloning shares the underlying store. Writes can be made to fail on
/// demand with [`set_fail_writes`](Self::set_fail_writes).
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngagementGateway {
    data: Arc<RwLock<StoreData>>,
    fail_writes: Arc<AtomicBool>,
    pinned_now: Option<DateTime<Utc>>,
}

impl InMemoryEngagementGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store seeded from `fixture`.
    pub fn from_fixture(fixture: SocialFixture) -> Self {
        let data = StoreData {
            profiles: fixture
                .profiles
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            stories: fixture.stories,
            follows: fixture.follows.into_iter().collect(),
            likes: fixture
                .likes
                .into_iter()
                .map(|l| (l.story_id, l.user_id))
                .collect(),
            messages: Vec::new(),
        };
        Self {
            data: Arc::new(RwLock::new(data)),
            ..Self::default()
        }
    }

    /// Evaluates story expiry against a fixed instant instead of the wall clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.pinned_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    /// Makes every subsequent write fail with a network error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> GatewayResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("store unavailable".to_string()));
        }
        Ok(())
    }

    pub async fn add_profile(&self, profile: AuthorProfile) {
        let mut data = self.data.write().await;
        data.profiles.insert(profile.id.clone(), profile);
    }

    pub async fn add_story(&self, story: Story) {
        let mut data = self.data.write().await;
        data.stories.push(story);
    }

    pub async fn follow(&self, follower_id: &str, following_id: &str) {
        let mut data = self.data.write().await;
        data.follows.insert(Follow {
            follower_id: follower_id.to_string(),
            following_id: following_id.to_string(),
        });
    }

    /// Messages exchanged between two accounts, oldest first.
    pub async fn conversation(&self, a: &str, b: &str) -> Vec<DirectMessage> {
        let data = self.data.read().await;
        data.messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b) || (m.sender_id == b && m.recipient_id == a)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EngagementGateway for InMemoryEngagementGateway {
    async fn fetch_like_state(&self, story_id: &str, viewer_id: &str) -> GatewayResult<bool> {
        let data = self.data.read().await;
        if !data.has_story(story_id) {
            return Err(GatewayError::not_found("story", story_id));
        }
        Ok(data
            .likes
            .contains(&(story_id.to_string(), viewer_id.to_string())))
    }

    async fn fetch_like_count(&self, story_id: &str) -> GatewayResult<u64> {
        let data = self.data.read().await;
        if !data.has_story(story_id) {
            return Err(GatewayError::not_found("story", story_id));
        }
        Ok(data.likes.iter().filter(|(s, _)| s == story_id).count() as u64)
    }

    async fn set_liked(&self, story_id: &str, viewer_id: &str, liked: bool) -> GatewayResult<()> {
        self.check_writable()?;
        let mut data = self.data.write().await;
        if !data.has_story(story_id) {
            return Err(GatewayError::not_found("story", story_id));
        }

        let key = (story_id.to_string(), viewer_id.to_string());
        if liked {
            data.likes.insert(key);
        } else {
            data.likes.remove(&key);
        }
        Ok(())
    }

    async fn send_direct_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        text: &str,
    ) -> GatewayResult<MessageId> {
        self.check_writable()?;
        if text.trim().is_empty() {
            return Err(GatewayError::Rejected("message text is empty".to_string()));
        }

        let mut data = self.data.write().await;
        if !data.profiles.contains_key(recipient_id) {
            return Err(GatewayError::not_found("profile", recipient_id));
        }

        let id = Uuid::new_v4().to_string();
        data.messages.push(DirectMessage {
            id: id.clone(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        tracing::debug!("Stored direct message {} from {} to {}", id, sender_id, recipient_id);
        Ok(id)
    }

    async fn fetch_eligible_story_groups(&self, viewer_id: &str) -> GatewayResult<Vec<StoryGroup>> {
        let data = self.data.read().await;
        let connected = data.connected_authors(viewer_id);

        let candidates: Vec<Story> = data
            .stories
            .iter()
            .filter(|s| connected.contains(&s.author_id))
            .cloned()
            .collect();

        let mut groups = group_by_author(&candidates, &data.profiles, self.now());
        order_groups(&mut groups);
        Ok(groups)
    }
}
