use crate::engagement::{GatewayError, LikeEntry};
use crate::story::StoryId;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Transient message the host shows the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    LikeFailed {
        story_id: StoryId,
        error: GatewayError,
    },
    ReplySent {
        story_id: StoryId,
    },
    ReplyFailed {
        story_id: StoryId,
        error: GatewayError,
    },
}

/// Signals a session emits for the hosting view to render.
///
/// Every method has an empty default so hosts implement only what they draw.
pub trait SessionObserver: Send + Sync {
    fn on_progress_changed(&self, _percent: u8) {}
    fn on_cursor_changed(&self, _group_index: usize, _story_index: usize) {}
    fn on_ad_visibility_changed(&self, _visible: bool) {}
    fn on_ad_countdown_changed(&self, _seconds_remaining: u64) {}
    fn on_like_changed(&self, _story_id: &str, _like: LikeEntry) {}
    fn on_notice(&self, _notice: &Notice) {}
    fn on_session_closed(&self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// One recorded observer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum SessionSignal {
    Progress { percent: u8 },
    Cursor { group_index: usize, story_index: usize },
    AdVisibility { visible: bool },
    AdCountdown { seconds_remaining: u64 },
    Like { story_id: StoryId, like: LikeEntry },
    Notice { notice: Notice },
    Closed,
}

/// Observer that keeps every signal in order. Used by tests and by hosts
/// that poll instead of reacting.
#[derive(Debug, Default)]
pub struct SignalRecorder {
    signals: Mutex<Vec<SessionSignal>>,
}

impl SignalRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, signal: SessionSignal) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(signal);
        }
    }

    pub fn signals(&self) -> Vec<SessionSignal> {
        self.signals
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Cursor positions in the order they were shown.
    pub fn cursor_trace(&self) -> Vec<(usize, usize)> {
        self.signals()
            .into_iter()
            .filter_map(|s| match s {
                SessionSignal::Cursor {
                    group_index,
                    story_index,
                } => Some((group_index, story_index)),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.signals()
            .into_iter()
            .filter_map(|s| match s {
                SessionSignal::Notice { notice } => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.signals().contains(&SessionSignal::Closed)
    }

    pub fn clear(&self) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.clear();
        }
    }
}

impl SessionObserver for SignalRecorder {
    fn on_progress_changed(&self, percent: u8) {
        self.push(SessionSignal::Progress { percent });
    }

    fn on_cursor_changed(&self, group_index: usize, story_index: usize) {
        self.push(SessionSignal::Cursor {
            group_index,
            story_index,
        });
    }

    fn on_ad_visibility_changed(&self, visible: bool) {
        self.push(SessionSignal::AdVisibility { visible });
    }

    fn on_ad_countdown_changed(&self, seconds_remaining: u64) {
        self.push(SessionSignal::AdCountdown { seconds_remaining });
    }

    fn on_like_changed(&self, story_id: &str, like: LikeEntry) {
        self.push(SessionSignal::Like {
            story_id: story_id.to_string(),
            like,
        });
    }

    fn on_notice(&self, notice: &Notice) {
        self.push(SessionSignal::Notice {
            notice: notice.clone(),
        });
    }

    fn on_session_closed(&self) {
        self.push(SessionSignal::Closed);
    }
}
