use super::ad_policy::AdPolicy;
use super::clock::{ClockEvent, SessionClock};
use super::effect::{LikeCommand, LikeMutation, ReplyCommand, SessionEffect};
use super::observer::{Notice, SessionObserver};
use super::state::{Cursor, PlaybackState, SessionId, SessionSnapshot, SessionState};
use crate::auth::AuthContext;
use crate::config::SessionConfig;
use crate::engagement::{GatewayResult, LikeEntry, MessageId};
use crate::error::{GlimpseError, ReplyRejection, Result};
use crate::story::StoryGroup;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

const LOG_TARGET: &str = "story_session";

/// The story playback state machine.
///
/// `StorySessionController` owns the [`SessionState`] of at most one open
/// session and reconciles three sources of input:
/// - viewer gestures (`hold_*`, `tap_*`, `ad_completed`, `close`)
/// - clock ticks (`tick`, `clock_completed`)
/// - gateway outcomes (`like_state_loaded`, `settle_like`, `settle_reply`)
///
/// It is synchronous and performs no I/O. Gateway work is queued as
/// [`SessionEffect`]s which the host drains with [`take_effects`](Self::take_effects)
/// and executes; results come back tagged with the issuing session id so
/// answers arriving after close are discarded.
pub struct StorySessionController {
    auth: AuthContext,
    config: SessionConfig,
    ad_policy: AdPolicy,
    observer: Arc<dyn SessionObserver>,
    clock: SessionClock,
    playback: PlaybackState,
    session: Option<SessionState>,
    effects: Vec<SessionEffect>,
    last_percent: Option<u8>,
    last_ad_seconds: Option<u64>,
}

impl StorySessionController {
    pub fn new(
        auth: AuthContext,
        config: SessionConfig,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            ad_policy: AdPolicy::from_config(&config),
            clock: SessionClock::new(config.story_duration_ms, config.tick_interval_ms),
            auth,
            config,
            observer,
            playback: PlaybackState::Idle,
            session: None,
            effects: Vec::new(),
            last_percent: None,
            last_ad_seconds: None,
        }
    }

    /// Replaces the ad cadence derived from the config.
    pub fn with_ad_policy(mut self, ad_policy: AdPolicy) -> Self {
        self.ad_policy = ad_policy;
        self
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Opens a session on the first story of `groups[group_index]`.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::EmptySession`] without touching any state when
    /// a session is already open, `groups` is empty, or the index is invalid.
    pub fn open(&mut self, groups: Vec<StoryGroup>, group_index: usize) -> Result<SessionId> {
        self.open_at(groups, Cursor::new(group_index, 0))
    }

    /// Opens a session at an arbitrary cursor.
    pub fn open_at(&mut self, groups: Vec<StoryGroup>, cursor: Cursor) -> Result<SessionId> {
        if self.playback != PlaybackState::Idle {
            debug!(target: LOG_TARGET, "Open ignored: a session is already active");
            return Err(GlimpseError::EmptySession);
        }

        let group_count = groups.len();
        let Some(state) = SessionState::new(Uuid::new_v4().to_string(), groups, cursor) else {
            debug!(
                target: LOG_TARGET,
                "Open refused: {} groups, cursor {:?}", group_count, cursor
            );
            return Err(GlimpseError::EmptySession);
        };

        let session_id = state.id.clone();
        info!(
            target: LOG_TARGET,
            session_id = %session_id,
            groups = group_count,
            "Story session opened at ({}, {})",
            cursor.group_index,
            cursor.story_index
        );

        self.session = Some(state);
        self.playback = PlaybackState::Playing;
        self.clock.arm();
        self.enter_story();
        Ok(session_id)
    }

    /// Tears the session down. No-op when nothing is open.
    pub fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        self.clock.disarm();
        self.playback = PlaybackState::Idle;
        self.last_percent = None;
        self.last_ad_seconds = None;
        self.effects
            .retain(|e| !matches!(e, SessionEffect::LoadLikeState { .. }));

        if session.ad_visible {
            self.observer.on_ad_visibility_changed(false);
        }
        info!(
            target: LOG_TARGET,
            session_id = %session.id,
            viewed_count = session.viewed_count,
            "Story session closed"
        );
        self.observer.on_session_closed();
    }

    /// Closes any open session and guarantees the tick schedule is cancelled.
    pub fn dispose(&mut self) {
        self.close();
        self.clock.disarm();
    }

    // ============================================================================
    // Viewer input
    // ============================================================================

    pub fn hold_start(&mut self) {
        if self.playback != PlaybackState::Playing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.paused = true;
        }
        self.clock.pause();
        self.playback = PlaybackState::Paused;
    }

    pub fn hold_end(&mut self) {
        if self.playback != PlaybackState::Paused {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.paused = false;
        }
        self.clock.resume();
        self.playback = PlaybackState::Playing;
    }

    pub fn tap_forward(&mut self) {
        self.advance_forward();
    }

    pub fn tap_backward(&mut self) {
        self.advance_backward();
    }

    /// The interstitial was skipped or its countdown ran out.
    pub fn ad_completed(&mut self) {
        if self.playback != PlaybackState::AdInterstitial {
            debug!(target: LOG_TARGET, "Ad completion ignored in {:?}", self.playback);
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.ad_visible = false;
            session.ad_remaining_ms = 0;
            session.paused = false;
        }
        self.last_ad_seconds = None;
        self.playback = PlaybackState::Playing;
        self.observer.on_ad_visibility_changed(false);
        self.move_forward();
    }

    // ============================================================================
    // Clock input
    // ============================================================================

    /// Feeds one clock tick into the session.
    pub fn tick(&mut self) {
        match self.playback {
            PlaybackState::Playing => match self.clock.tick() {
                ClockEvent::Progressed(_) => self.emit_progress(),
                ClockEvent::Completed => {
                    self.emit_progress();
                    if let Some((session_id, story_id)) = self.current_ids() {
                        // The cursor cannot have moved within this call.
                        let _ = self.clock_completed(&session_id, &story_id);
                    }
                }
                ClockEvent::Idle => {}
            },
            PlaybackState::AdInterstitial => self.tick_ad_countdown(),
            PlaybackState::Paused | PlaybackState::Idle => {}
        }
    }

    /// Completion of the story identified by `(session_id, story_id)`.
    ///
    /// # Errors
    ///
    /// [`GlimpseError::StaleEvent`] when that story is no longer playing; the
    /// event is dropped.
    pub fn clock_completed(&mut self, session_id: &str, story_id: &str) -> Result<()> {
        let current = self
            .current_ids()
            .is_some_and(|(sid, id)| sid == session_id && id == story_id);
        if self.playback != PlaybackState::Playing || !current {
            debug!(
                target: LOG_TARGET,
                "Stale completion for story {} discarded", story_id
            );
            return Err(GlimpseError::StaleEvent);
        }
        self.advance_forward();
        Ok(())
    }

    fn tick_ad_countdown(&mut self) {
        let tick_ms = self.clock.tick_ms();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.ad_remaining_ms = session.ad_remaining_ms.saturating_sub(tick_ms);
        let remaining = session.ad_remaining_ms;

        if remaining == 0 {
            self.ad_completed();
        } else {
            self.emit_ad_countdown(remaining);
        }
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    fn advance_forward(&mut self) {
        if !self.playback.shows_story() {
            debug!(target: LOG_TARGET, "Forward ignored in {:?}", self.playback);
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.viewed_count += 1;
        if self
            .ad_policy
            .should_intercept_next(session.viewed_count, session.ad_visible)
        {
            session.ad_visible = true;
            session.paused = false;
            session.ad_remaining_ms = self.ad_policy.countdown_ms();
            let remaining = session.ad_remaining_ms;
            debug!(
                target: LOG_TARGET,
                viewed_count = session.viewed_count,
                "Interstitial shown"
            );

            self.clock.stop();
            self.playback = PlaybackState::AdInterstitial;
            self.observer.on_ad_visibility_changed(true);
            self.emit_ad_countdown(remaining);
            return;
        }

        self.move_forward();
    }

    fn move_forward(&mut self) {
        let next = self.session.as_ref().and_then(SessionState::next_cursor);
        match next {
            Some(cursor) => self.move_to(cursor),
            None => self.close(),
        }
    }

    fn advance_backward(&mut self) {
        if !self.playback.shows_story() {
            debug!(target: LOG_TARGET, "Backward ignored in {:?}", self.playback);
            return;
        }
        match self.session.as_ref().and_then(SessionState::previous_cursor) {
            Some(cursor) => self.move_to(cursor),
            None => debug!(target: LOG_TARGET, "Already at the first story"),
        }
    }

    fn move_to(&mut self, cursor: Cursor) {
        if let Some(session) = self.session.as_mut() {
            session.cursor = cursor;
        }
        self.enter_story();
    }

    /// Restarts the clock for the story under the cursor and announces it.
    fn enter_story(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.clock.start(self.config.story_duration_ms);
        if session.paused {
            self.clock.pause();
        }

        let cursor = session.cursor;
        let story_id = session.current_story().id.clone();
        let cached = session.like_cache.get(&story_id).copied();
        let needs_load = cached.is_none() && session.pending_like_loads.insert(story_id.clone());
        let load = needs_load.then(|| SessionEffect::LoadLikeState {
            session_id: session.id.clone(),
            story_id: story_id.clone(),
            viewer_id: self.auth.viewer_id.clone(),
        });

        self.last_percent = None;
        self.observer
            .on_cursor_changed(cursor.group_index, cursor.story_index);
        self.emit_progress();

        if let Some(effect) = load {
            self.effects.push(effect);
        } else if let Some(like) = cached {
            self.observer.on_like_changed(&story_id, like);
        }
    }

    // ============================================================================
    // Engagement
    // ============================================================================

    /// Optimistically flips the viewer's like on `story_id` and queues the
    /// write. Returns the entry as now displayed.
    pub fn toggle_like(&mut self, story_id: &str) -> Result<LikeEntry> {
        let session = self.session.as_mut().ok_or(GlimpseError::NoActiveSession)?;
        if session.find_story(story_id).is_none() {
            return Err(GlimpseError::story_not_found(story_id));
        }
        let entry = session
            .like_cache
            .get_mut(story_id)
            .ok_or_else(|| GlimpseError::like_state_unavailable(story_id))?;

        let mutation = LikeMutation::toggle_of(*entry);
        mutation.apply(entry);
        let updated = *entry;
        *session
            .like_writes_in_flight
            .entry(story_id.to_string())
            .or_insert(0) += 1;

        self.effects.push(SessionEffect::WriteLike(LikeCommand {
            session_id: session.id.clone(),
            story_id: story_id.to_string(),
            viewer_id: self.auth.viewer_id.clone(),
            mutation,
        }));
        self.observer.on_like_changed(story_id, updated);
        Ok(updated)
    }

    /// Applies the store's answer to a [`LikeCommand`].
    ///
    /// Successful writes advance the store-confirmed entry. Once no write for
    /// the story is left in flight the displayed entry is reset to the
    /// confirmed one, which rolls back every optimistic change that failed.
    pub fn settle_like(&mut self, command: &LikeCommand, result: GatewayResult<()>) {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.id == command.session_id)
        else {
            debug!(target: LOG_TARGET, "Like result for a closed session discarded");
            return;
        };

        let in_flight = session
            .like_writes_in_flight
            .get_mut(&command.story_id)
            .map(|n| {
                *n = n.saturating_sub(1);
                *n
            })
            .unwrap_or(0);
        if in_flight == 0 {
            session.like_writes_in_flight.remove(&command.story_id);
        }

        let Some(confirmed) = session.like_confirmed.get_mut(&command.story_id) else {
            return;
        };
        let failure = match result {
            Ok(()) => {
                command.mutation.confirm(confirmed);
                None
            }
            Err(error) => {
                warn!(
                    target: LOG_TARGET,
                    story_id = %command.story_id,
                    "Like write failed: {}", error
                );
                Some(error)
            }
        };
        let confirmed = *confirmed;

        let restored = match session.like_cache.get_mut(&command.story_id) {
            Some(entry) if in_flight == 0 && *entry != confirmed => {
                *entry = confirmed;
                Some(confirmed)
            }
            _ => None,
        };

        if let Some(entry) = restored {
            self.observer.on_like_changed(&command.story_id, entry);
        }
        if let Some(error) = failure {
            self.observer.on_notice(&Notice::LikeFailed {
                story_id: command.story_id.clone(),
                error,
            });
        }
    }

    /// Stores the first like state fetched for a story.
    pub fn like_state_loaded(
        &mut self,
        session_id: &str,
        story_id: &str,
        result: GatewayResult<LikeEntry>,
    ) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == session_id) else {
            debug!(target: LOG_TARGET, "Like state for a closed session discarded");
            return;
        };
        session.pending_like_loads.remove(story_id);

        match result {
            Ok(loaded) => {
                let entry = *session
                    .like_cache
                    .entry(story_id.to_string())
                    .or_insert(loaded);
                session
                    .like_confirmed
                    .entry(story_id.to_string())
                    .or_insert(entry);
                if session.current_story().id == story_id {
                    self.observer.on_like_changed(story_id, entry);
                }
            }
            Err(error) => {
                warn!(
                    target: LOG_TARGET,
                    story_id = %story_id,
                    "Failed to load like state: {}", error
                );
            }
        }
    }

    /// Validates a reply and queues it for delivery to the story's author.
    ///
    /// # Errors
    ///
    /// - [`GlimpseError::ReplyRejected`] for blank text or the viewer's own story
    /// - [`GlimpseError::StoryNotFound`] when the story is not in this session
    pub fn send_reply(&mut self, story_id: &str, text: &str) -> Result<()> {
        let session = self.session.as_ref().ok_or(GlimpseError::NoActiveSession)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GlimpseError::ReplyRejected(ReplyRejection::Empty));
        }
        let story = session
            .find_story(story_id)
            .ok_or_else(|| GlimpseError::story_not_found(story_id))?;
        if self.auth.is_viewer(&story.author_id) {
            return Err(GlimpseError::ReplyRejected(ReplyRejection::OwnStory));
        }

        self.effects.push(SessionEffect::SendReply(ReplyCommand {
            session_id: session.id.clone(),
            story_id: story_id.to_string(),
            sender_id: self.auth.viewer_id.clone(),
            recipient_id: story.author_id.clone(),
            text: text.to_string(),
        }));
        Ok(())
    }

    pub fn settle_reply(&mut self, command: &ReplyCommand, result: GatewayResult<MessageId>) {
        if self.session_id() != Some(command.session_id.as_str()) {
            debug!(target: LOG_TARGET, "Reply result for a closed session discarded");
            return;
        }

        let notice = match result {
            Ok(message_id) => {
                debug!(target: LOG_TARGET, message_id = %message_id, "Reply delivered");
                Notice::ReplySent {
                    story_id: command.story_id.clone(),
                }
            }
            Err(error) => {
                warn!(target: LOG_TARGET, "Reply failed: {}", error);
                Notice::ReplyFailed {
                    story_id: command.story_id.clone(),
                    error,
                }
            }
        };
        self.observer.on_notice(&notice);
    }

    /// Drains the effects queued since the last call.
    pub fn take_effects(&mut self) -> Vec<SessionEffect> {
        std::mem::take(&mut self.effects)
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.session.as_ref().map(|s| s.cursor)
    }

    pub fn viewed_count(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.viewed_count)
    }

    pub fn is_ad_visible(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.ad_visible)
    }

    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    pub fn like_entry(&self, story_id: &str) -> Option<LikeEntry> {
        self.session
            .as_ref()
            .and_then(|s| s.like_cache.get(story_id).copied())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Token of the running tick schedule; cancelled on close and dispose.
    pub fn clock_schedule(&self) -> Option<CancellationToken> {
        self.clock.schedule()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let session = self.session.as_ref()?;
        let story = session.current_story();
        Some(SessionSnapshot {
            session_id: session.id.clone(),
            state: self.playback,
            cursor: session.cursor,
            story_id: story.id.clone(),
            author_id: story.author_id.clone(),
            progress_percent: self.clock.percent(),
            viewed_count: session.viewed_count,
            ad_visible: session.ad_visible,
            like: session.like_cache.get(&story.id).copied(),
        })
    }

    fn current_ids(&self) -> Option<(SessionId, String)> {
        self.session
            .as_ref()
            .map(|s| (s.id.clone(), s.current_story().id.clone()))
    }

    fn emit_progress(&mut self) {
        let percent = self.clock.percent();
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            self.observer.on_progress_changed(percent);
        }
    }

    fn emit_ad_countdown(&mut self, remaining_ms: u64) {
        let seconds = remaining_ms.div_ceil(1_000);
        if self.last_ad_seconds != Some(seconds) {
            self.last_ad_seconds = Some(seconds);
            self.observer.on_ad_countdown_changed(seconds);
        }
    }
}

impl Drop for StorySessionController {
    fn drop(&mut self) {
        self.clock.disarm();
    }
}
