use crate::engagement::LikeEntry;
use crate::story::{Story, StoryGroup, StoryId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Identifier of one open viewer session.
pub type SessionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    AdInterstitial,
}

impl PlaybackState {
    /// States in which a story is on screen.
    pub fn shows_story(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// `(group_index, story_index)` into the session's groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub group_index: usize,
    pub story_index: usize,
}

impl Cursor {
    pub fn new(group_index: usize, story_index: usize) -> Self {
        Self {
            group_index,
            story_index,
        }
    }
}

/// Mutable state of one open session. Owned by the controller and dropped
/// when the session closes.
#[derive(Debug)]
pub struct SessionState {
    pub id: SessionId,
    pub groups: Vec<StoryGroup>,
    pub cursor: Cursor,
    pub paused: bool,
    pub viewed_count: u64,
    pub ad_visible: bool,
    /// Time left on the visible interstitial.
    pub ad_remaining_ms: u64,
    /// Like entries as displayed, optimistic changes included.
    pub like_cache: HashMap<StoryId, LikeEntry>,
    /// Like entries as the store last confirmed them.
    pub like_confirmed: HashMap<StoryId, LikeEntry>,
    /// Unsettled like writes per story.
    pub like_writes_in_flight: HashMap<StoryId, u32>,
    /// Stories whose like state has been requested but not yet received.
    pub pending_like_loads: HashSet<StoryId>,
}

impl SessionState {
    /// Builds state for `groups` positioned at `cursor`, or `None` when the
    /// cursor does not address a story or some group is empty.
    pub fn new(id: SessionId, groups: Vec<StoryGroup>, cursor: Cursor) -> Option<Self> {
        let valid = !groups.iter().any(StoryGroup::is_empty)
            && groups
                .get(cursor.group_index)
                .is_some_and(|g| cursor.story_index < g.len());
        if !valid {
            return None;
        }

        Some(Self {
            id,
            groups,
            cursor,
            paused: false,
            viewed_count: 0,
            ad_visible: false,
            ad_remaining_ms: 0,
            like_cache: HashMap::new(),
            like_confirmed: HashMap::new(),
            like_writes_in_flight: HashMap::new(),
            pending_like_loads: HashSet::new(),
        })
    }

    pub fn current_group(&self) -> &StoryGroup {
        &self.groups[self.cursor.group_index]
    }

    pub fn current_story(&self) -> &Story {
        &self.current_group().stories[self.cursor.story_index]
    }

    /// Cursor one story forward, crossing into the next group if needed.
    pub fn next_cursor(&self) -> Option<Cursor> {
        let Cursor {
            group_index,
            story_index,
        } = self.cursor;
        if story_index + 1 < self.groups[group_index].len() {
            Some(Cursor::new(group_index, story_index + 1))
        } else if group_index + 1 < self.groups.len() {
            Some(Cursor::new(group_index + 1, 0))
        } else {
            None
        }
    }

    /// Cursor one story back. Crossing a group boundary lands on the last
    /// story of the previous group.
    pub fn previous_cursor(&self) -> Option<Cursor> {
        let Cursor {
            group_index,
            story_index,
        } = self.cursor;
        if story_index > 0 {
            Some(Cursor::new(group_index, story_index - 1))
        } else if group_index > 0 {
            let previous = &self.groups[group_index - 1];
            Some(Cursor::new(group_index - 1, previous.len().saturating_sub(1)))
        } else {
            None
        }
    }

    /// Finds a story anywhere in the session.
    pub fn find_story(&self, story_id: &str) -> Option<&Story> {
        self.groups
            .iter()
            .flat_map(|g| g.stories.iter())
            .find(|s| s.id == story_id)
    }
}

/// Read-only view of a session handed to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub state: PlaybackState,
    pub cursor: Cursor,
    pub story_id: StoryId,
    pub author_id: String,
    pub progress_percent: u8,
    pub viewed_count: u64,
    pub ad_visible: bool,
    pub like: Option<LikeEntry>,
}
