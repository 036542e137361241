use super::*;
use crate::auth::AuthContext;
use crate::config::SessionConfig;
use crate::engagement::{GatewayError, LikeEntry};
use crate::error::{GlimpseError, ReplyRejection};
use crate::story::{AuthorProfile, MediaKind, Story, StoryGroup};
use chrono::{Duration, Utc};
use std::sync::Arc;

const VIEWER: &str = "viewer";

fn group(author: &str, count: usize) -> StoryGroup {
    let now = Utc::now();
    StoryGroup {
        author: AuthorProfile::placeholder(author),
        stories: (0..count)
            .map(|i| Story {
                id: format!("{author}{}", i + 1),
                author_id: author.to_string(),
                media_url: format!("https://cdn.example/{author}/{i}.jpg"),
                media_kind: MediaKind::Image,
                created_at: now + Duration::seconds(i as i64),
                expires_at: now + Duration::hours(24),
            })
            .collect(),
    }
}

/// 1s stories at 100ms resolution: ten ticks per story.
fn config(ad_frequency: u32) -> SessionConfig {
    SessionConfig {
        story_duration_ms: 1_000,
        tick_interval_ms: 100,
        ad_frequency,
        ad_countdown_ms: 300,
    }
}

fn controller(ad_frequency: u32) -> (StorySessionController, Arc<SignalRecorder>) {
    let recorder = Arc::new(SignalRecorder::new());
    let controller =
        StorySessionController::new(AuthContext::new(VIEWER), config(ad_frequency), recorder.clone());
    (controller, recorder)
}

fn progress_signals(recorder: &SignalRecorder) -> Vec<u8> {
    recorder
        .signals()
        .into_iter()
        .filter_map(|s| match s {
            SessionSignal::Progress { percent } => Some(percent),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Opening
// ============================================================================

#[test]
fn test_open_with_no_groups_is_refused() {
    let (mut controller, recorder) = controller(3);

    let result = controller.open(Vec::new(), 0);

    assert_eq!(result, Err(GlimpseError::EmptySession));
    assert_eq!(controller.playback_state(), PlaybackState::Idle);
    assert!(controller.snapshot().is_none());
    assert!(controller.clock_schedule().is_none());
    assert!(recorder.signals().is_empty());
}

#[test]
fn test_open_with_invalid_index_is_refused() {
    let (mut controller, recorder) = controller(3);
    assert!(controller.open(vec![group("a", 1)], 4).is_err());
    assert!(recorder.signals().is_empty());
}

#[test]
fn test_open_starts_playing_first_story() {
    let (mut controller, recorder) = controller(3);

    controller.open(vec![group("a", 2), group("b", 1)], 1).unwrap();

    assert_eq!(controller.playback_state(), PlaybackState::Playing);
    assert_eq!(controller.cursor(), Some(Cursor::new(1, 0)));
    assert_eq!(recorder.cursor_trace(), vec![(1, 0)]);
    assert_eq!(progress_signals(&recorder), vec![0]);
    assert!(controller.clock_schedule().is_some());
}

#[test]
fn test_open_while_active_is_ignored() {
    let (mut controller, _) = controller(3);
    let first = controller.open(vec![group("a", 2)], 0).unwrap();

    assert!(controller.open(vec![group("b", 1)], 0).is_err());
    assert_eq!(controller.session_id(), Some(first.as_str()));
}

#[test]
fn test_open_queues_like_state_load() {
    let (mut controller, _) = controller(3);
    let session_id = controller.open(vec![group("a", 1)], 0).unwrap();

    assert_eq!(
        controller.take_effects(),
        vec![SessionEffect::LoadLikeState {
            session_id,
            story_id: "a1".to_string(),
            viewer_id: VIEWER.to_string(),
        }]
    );
    assert!(controller.take_effects().is_empty());
}

// ============================================================================
// Clock and progress
// ============================================================================

#[test]
fn test_ticks_advance_progress_and_complete_story() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();

    for _ in 0..5 {
        controller.tick();
    }
    assert_eq!(controller.snapshot().unwrap().progress_percent, 50);

    for _ in 0..5 {
        controller.tick();
    }
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
    assert_eq!(controller.progress(), 0.0);
    assert_eq!(controller.viewed_count(), 1);
    assert_eq!(
        progress_signals(&recorder),
        vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 0]
    );
}

#[test]
fn test_progress_resets_on_every_cursor_change() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2), group("b", 2)], 0).unwrap();

    for step in 0..6 {
        for _ in 0..4 {
            controller.tick();
        }
        assert!((0.0..=100.0).contains(&controller.progress()));
        if step % 2 == 0 {
            controller.tap_forward();
        } else {
            controller.tap_backward();
        }
        assert_eq!(controller.progress(), 0.0);
    }
}

#[test]
fn test_last_story_completion_closes_session() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 1)], 0).unwrap();

    for _ in 0..10 {
        controller.tick();
    }

    assert_eq!(controller.playback_state(), PlaybackState::Idle);
    assert!(recorder.is_closed());
}

#[test]
fn test_stale_completion_is_discarded() {
    let (mut controller, _) = controller(0);
    let session_id = controller.open(vec![group("a", 3)], 0).unwrap();

    controller.tap_forward();
    let result = controller.clock_completed(&session_id, "a1");

    assert_eq!(result, Err(GlimpseError::StaleEvent));
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
    assert_eq!(controller.viewed_count(), 1);
}

#[test]
fn test_completion_for_current_story_advances() {
    let (mut controller, _) = controller(0);
    let session_id = controller.open(vec![group("a", 3)], 0).unwrap();

    controller.clock_completed(&session_id, "a1").unwrap();

    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
}

#[test]
fn test_completion_from_other_session_is_discarded() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 3)], 0).unwrap();

    assert!(controller.clock_completed("another-session", "a1").is_err());
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 0)));
}

// ============================================================================
// Hold to pause
// ============================================================================

#[test]
fn test_hold_start_is_idempotent() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();
    controller.tick();
    controller.tick();

    controller.hold_start();
    let once = controller.snapshot().unwrap();
    controller.hold_start();
    let twice = controller.snapshot().unwrap();

    assert_eq!(once, twice);
    assert_eq!(controller.playback_state(), PlaybackState::Paused);
}

#[test]
fn test_hold_freezes_and_release_resumes_progress() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();
    for _ in 0..3 {
        controller.tick();
    }

    controller.hold_start();
    for _ in 0..20 {
        controller.tick();
    }
    assert_eq!(controller.snapshot().unwrap().progress_percent, 30);
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 0)));

    controller.hold_end();
    controller.tick();
    assert_eq!(controller.playback_state(), PlaybackState::Playing);
    assert_eq!(controller.snapshot().unwrap().progress_percent, 40);
}

#[test]
fn test_hold_end_without_hold_is_noop() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();
    controller.hold_end();
    assert_eq!(controller.playback_state(), PlaybackState::Playing);
}

#[test]
fn test_navigation_while_held_stays_paused() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 3)], 0).unwrap();

    controller.hold_start();
    controller.tap_forward();
    controller.tick();

    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
    assert_eq!(controller.playback_state(), PlaybackState::Paused);
    assert_eq!(controller.progress(), 0.0);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_backward_across_boundary_lands_on_last_story() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2), group("b", 3)], 1).unwrap();

    controller.tap_backward();

    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
    assert_eq!(controller.snapshot().unwrap().story_id, "a2");
}

#[test]
fn test_backward_at_first_story_is_noop() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();
    controller.tick();

    controller.tap_backward();

    assert_eq!(recorder.cursor_trace(), vec![(0, 0)]);
    assert_eq!(controller.snapshot().unwrap().progress_percent, 10);
}

#[test]
fn test_viewed_count_never_decreases() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 3), group("b", 2)], 0).unwrap();

    let mut previous = controller.viewed_count();
    let moves = [true, true, false, false, true, false, true, true];
    for forward in moves {
        if forward {
            controller.tap_forward();
        } else {
            controller.tap_backward();
        }
        assert!(controller.viewed_count() >= previous);
        previous = controller.viewed_count();
    }
    assert_eq!(previous, 5);
}

#[test]
fn test_forward_crosses_into_next_group() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 1), group("b", 2)], 0).unwrap();

    controller.tap_forward();
    controller.tap_forward();

    assert_eq!(recorder.cursor_trace(), vec![(0, 0), (1, 0), (1, 1)]);
}

// ============================================================================
// Interstitials
// ============================================================================

#[test]
fn test_interstitial_after_third_advance() {
    let (mut controller, recorder) = controller(3);
    controller.open(vec![group("a", 5)], 0).unwrap();

    controller.tap_forward();
    controller.tap_forward();
    assert!(!controller.is_ad_visible());

    controller.tap_forward();
    assert!(controller.is_ad_visible());
    assert_eq!(controller.playback_state(), PlaybackState::AdInterstitial);
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 2)));
    assert_eq!(controller.viewed_count(), 3);
    assert!(
        recorder
            .signals()
            .contains(&SessionSignal::AdVisibility { visible: true })
    );
}

#[test]
fn test_ad_completion_advances_without_counting() {
    let (mut controller, _) = controller(3);
    controller.open(vec![group("a", 5)], 0).unwrap();
    for _ in 0..3 {
        controller.tap_forward();
    }

    controller.ad_completed();

    assert!(!controller.is_ad_visible());
    assert_eq!(controller.playback_state(), PlaybackState::Playing);
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 3)));
    assert_eq!(controller.viewed_count(), 3);

    controller.tap_forward();
    assert!(!controller.is_ad_visible());
    assert_eq!(controller.viewed_count(), 4);
}

#[test]
fn test_taps_ignored_while_interstitial_visible() {
    let (mut controller, _) = controller(2);
    controller.open(vec![group("a", 5)], 0).unwrap();
    controller.tap_forward();
    controller.tap_forward();
    assert!(controller.is_ad_visible());

    controller.tap_forward();
    controller.tap_backward();
    controller.hold_start();

    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
    assert_eq!(controller.viewed_count(), 2);
    assert_eq!(controller.playback_state(), PlaybackState::AdInterstitial);
}

#[test]
fn test_ad_countdown_completes_interstitial() {
    let (mut controller, recorder) = controller(2);
    controller.open(vec![group("a", 4)], 0).unwrap();
    controller.tap_forward();
    controller.tap_forward();
    assert!(controller.is_ad_visible());

    controller.tick();
    controller.tick();
    assert!(controller.is_ad_visible());
    controller.tick();

    assert!(!controller.is_ad_visible());
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 2)));
    assert!(
        recorder
            .signals()
            .contains(&SessionSignal::AdCountdown { seconds_remaining: 1 })
    );
}

#[test]
fn test_ad_completed_outside_interstitial_is_ignored() {
    let (mut controller, _) = controller(3);
    controller.open(vec![group("a", 3)], 0).unwrap();
    controller.ad_completed();
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 0)));
}

#[test]
fn test_auto_advance_counts_toward_cadence() {
    let (mut controller, _) = controller(2);
    controller.open(vec![group("a", 4)], 0).unwrap();

    for _ in 0..20 {
        controller.tick();
    }

    assert!(controller.is_ad_visible());
    assert_eq!(controller.cursor(), Some(Cursor::new(0, 1)));
}

#[test]
fn test_end_to_end_trace() {
    let (mut controller, recorder) = controller(3);
    controller.open(vec![group("a", 2), group("b", 1)], 0).unwrap();

    controller.tap_forward();
    controller.tap_forward();
    controller.tap_forward();

    assert_eq!(recorder.cursor_trace(), vec![(0, 0), (0, 1), (1, 0)]);
    assert!(controller.is_ad_visible());
    assert_eq!(controller.viewed_count(), 3);

    controller.ad_completed();

    assert_eq!(controller.playback_state(), PlaybackState::Idle);
    assert!(recorder.is_closed());
    assert_eq!(recorder.cursor_trace(), vec![(0, 0), (0, 1), (1, 0)]);
}

// ============================================================================
// Closing
// ============================================================================

#[test]
fn test_no_progress_after_close() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 3)], 0).unwrap();
    controller.tick();
    let schedule = controller.clock_schedule().unwrap();

    controller.close();
    for _ in 0..30 {
        controller.tick();
    }
    controller.tap_forward();

    let signals = recorder.signals();
    let closed_at = signals
        .iter()
        .position(|s| *s == SessionSignal::Closed)
        .unwrap();
    assert_eq!(closed_at, signals.len() - 1);
    assert!(schedule.is_cancelled());
}

#[test]
fn test_close_hides_visible_interstitial() {
    let (mut controller, recorder) = controller(2);
    controller.open(vec![group("a", 4)], 0).unwrap();
    controller.tap_forward();
    controller.tap_forward();

    controller.close();

    let signals = recorder.signals();
    let n = signals.len();
    assert_eq!(signals[n - 2], SessionSignal::AdVisibility { visible: false });
    assert_eq!(signals[n - 1], SessionSignal::Closed);
}

#[test]
fn test_close_when_idle_is_noop() {
    let (mut controller, recorder) = controller(0);
    controller.close();
    controller.dispose();
    assert!(recorder.signals().is_empty());
}

#[test]
fn test_dispose_cancels_schedule() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 2)], 0).unwrap();
    let schedule = controller.clock_schedule().unwrap();

    controller.dispose();

    assert!(schedule.is_cancelled());
    assert!(!controller.is_active());
}

#[test]
fn test_reopen_after_close() {
    let (mut controller, _) = controller(0);
    let first = controller.open(vec![group("a", 1)], 0).unwrap();
    controller.close();

    let second = controller.open(vec![group("b", 1)], 0).unwrap();

    assert_ne!(first, second);
    assert_eq!(controller.viewed_count(), 0);
}

// ============================================================================
// Likes
// ============================================================================

fn open_with_likes(liked: bool, count: u64) -> (StorySessionController, Arc<SignalRecorder>, String) {
    let (mut controller, recorder) = controller(0);
    let session_id = controller.open(vec![group("a", 2)], 0).unwrap();
    controller.take_effects();
    controller.like_state_loaded(&session_id, "a1", Ok(LikeEntry { liked, count }));
    (controller, recorder, session_id)
}

fn take_like_command(controller: &mut StorySessionController) -> LikeCommand {
    match controller.take_effects().pop() {
        Some(SessionEffect::WriteLike(command)) => command,
        other => panic!("expected like write, got {other:?}"),
    }
}

#[test]
fn test_toggle_like_is_optimistic() {
    let (mut controller, _, _) = open_with_likes(false, 5);

    let shown = controller.toggle_like("a1").unwrap();

    assert_eq!(shown, LikeEntry { liked: true, count: 6 });
    let command = take_like_command(&mut controller);
    assert_eq!(command.mutation, LikeMutation::Like);
    assert!(command.mutation.target());
}

#[test]
fn test_failed_like_write_rolls_back() {
    let (mut controller, recorder, _) = open_with_likes(false, 5);
    controller.toggle_like("a1").unwrap();
    let command = take_like_command(&mut controller);

    controller.settle_like(&command, Err(GatewayError::Network("offline".into())));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 5 })
    );
    assert_eq!(
        recorder.notices(),
        vec![Notice::LikeFailed {
            story_id: "a1".to_string(),
            error: GatewayError::Network("offline".into()),
        }]
    );
}

#[test]
fn test_confirmed_like_write_keeps_state() {
    let (mut controller, recorder, _) = open_with_likes(true, 2);
    controller.toggle_like("a1").unwrap();
    let command = take_like_command(&mut controller);

    controller.settle_like(&command, Ok(()));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 1 })
    );
    assert!(recorder.notices().is_empty());
}

fn take_like_commands(controller: &mut StorySessionController) -> Vec<LikeCommand> {
    controller
        .take_effects()
        .into_iter()
        .filter_map(|effect| match effect {
            SessionEffect::WriteLike(command) => Some(command),
            _ => None,
        })
        .collect()
}

#[test]
fn test_superseded_failed_write_keeps_count() {
    let (mut controller, recorder, _) = open_with_likes(false, 5);
    controller.toggle_like("a1").unwrap();
    controller.toggle_like("a1").unwrap();
    let commands = take_like_commands(&mut controller);
    assert_eq!(commands.len(), 2);

    controller.settle_like(&commands[0], Err(GatewayError::Network("offline".into())));
    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 5 })
    );

    controller.settle_like(&commands[1], Ok(()));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 5 })
    );
    assert_eq!(recorder.notices().len(), 1);
}

#[test]
fn test_every_write_failing_restores_loaded_state() {
    let (mut controller, _, _) = open_with_likes(false, 5);
    controller.toggle_like("a1").unwrap();
    controller.toggle_like("a1").unwrap();
    controller.toggle_like("a1").unwrap();
    let commands = take_like_commands(&mut controller);

    for command in &commands {
        controller.settle_like(command, Err(GatewayError::Network("offline".into())));
    }

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 5 })
    );
}

#[test]
fn test_later_failure_keeps_earlier_confirmed_write() {
    let (mut controller, _, _) = open_with_likes(false, 5);
    controller.toggle_like("a1").unwrap();
    controller.toggle_like("a1").unwrap();
    let commands = take_like_commands(&mut controller);

    controller.settle_like(&commands[0], Ok(()));
    controller.settle_like(&commands[1], Err(GatewayError::Network("offline".into())));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: true, count: 6 })
    );
}

#[test]
fn test_rollback_from_zero_count_restores_loaded_entry() {
    let (mut controller, _, _) = open_with_likes(true, 0);
    let shown = controller.toggle_like("a1").unwrap();
    assert_eq!(shown, LikeEntry { liked: false, count: 0 });
    let command = take_like_command(&mut controller);

    controller.settle_like(&command, Err(GatewayError::Network("offline".into())));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: true, count: 0 })
    );
}

#[test]
fn test_toggle_like_does_not_touch_playback() {
    let (mut controller, _, _) = open_with_likes(false, 0);
    controller.hold_start();
    let before = controller.snapshot().unwrap();

    controller.toggle_like("a1").unwrap();

    let after = controller.snapshot().unwrap();
    assert_eq!(before.state, after.state);
    assert_eq!(before.viewed_count, after.viewed_count);
    assert_eq!(before.cursor, after.cursor);
}

#[test]
fn test_toggle_before_load_is_refused() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 1)], 0).unwrap();

    assert_eq!(
        controller.toggle_like("a1"),
        Err(GlimpseError::like_state_unavailable("a1"))
    );
}

#[test]
fn test_toggle_unknown_story_is_refused() {
    let (mut controller, _, _) = open_with_likes(false, 0);
    assert!(matches!(
        controller.toggle_like("zz"),
        Err(GlimpseError::StoryNotFound { .. })
    ));
}

#[test]
fn test_like_result_after_close_is_discarded() {
    let (mut controller, recorder, _) = open_with_likes(false, 5);
    controller.toggle_like("a1").unwrap();
    let command = take_like_command(&mut controller);
    controller.close();
    recorder.clear();

    controller.settle_like(&command, Err(GatewayError::Network("late".into())));
    controller.like_state_loaded(&command.session_id, "a2", Ok(LikeEntry::default()));

    assert!(recorder.signals().is_empty());
}

#[test]
fn test_like_cache_survives_navigation() {
    let (mut controller, _, _) = open_with_likes(true, 9);

    controller.tap_forward();
    let effects = controller.take_effects();
    assert_eq!(effects.len(), 1);

    controller.tap_backward();
    assert!(controller.take_effects().is_empty());
    assert_eq!(controller.snapshot().unwrap().like, Some(LikeEntry { liked: true, count: 9 }));
}

#[test]
fn test_first_loaded_state_wins() {
    let (mut controller, _, session_id) = open_with_likes(false, 1);

    controller.like_state_loaded(&session_id, "a1", Ok(LikeEntry { liked: true, count: 40 }));

    assert_eq!(
        controller.like_entry("a1"),
        Some(LikeEntry { liked: false, count: 1 })
    );
}

// ============================================================================
// Replies
// ============================================================================

#[test]
fn test_blank_reply_is_rejected_locally() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group("a", 1)], 0).unwrap();
    controller.take_effects();

    assert_eq!(
        controller.send_reply("a1", "   \n"),
        Err(GlimpseError::ReplyRejected(ReplyRejection::Empty))
    );
    assert!(controller.take_effects().is_empty());
}

#[test]
fn test_reply_to_own_story_is_rejected() {
    let (mut controller, _) = controller(0);
    controller.open(vec![group(VIEWER, 1)], 0).unwrap();
    controller.take_effects();

    assert_eq!(
        controller.send_reply("viewer1", "nice"),
        Err(GlimpseError::ReplyRejected(ReplyRejection::OwnStory))
    );
    assert!(controller.take_effects().is_empty());
}

#[test]
fn test_reply_is_queued_for_author() {
    let (mut controller, recorder) = controller(0);
    let session_id = controller.open(vec![group("a", 1)], 0).unwrap();
    controller.take_effects();

    controller.send_reply("a1", "  love this ").unwrap();

    let command = match controller.take_effects().pop() {
        Some(SessionEffect::SendReply(command)) => command,
        other => panic!("expected reply, got {other:?}"),
    };
    assert_eq!(command.recipient_id, "a");
    assert_eq!(command.sender_id, VIEWER);
    assert_eq!(command.text, "love this");
    assert_eq!(command.session_id, session_id);

    controller.settle_reply(&command, Ok("m-1".to_string()));
    assert_eq!(
        recorder.notices(),
        vec![Notice::ReplySent {
            story_id: "a1".to_string()
        }]
    );
}

#[test]
fn test_reply_failure_surfaces_notice() {
    let (mut controller, recorder) = controller(0);
    controller.open(vec![group("a", 1)], 0).unwrap();
    controller.send_reply("a1", "hey").unwrap();
    let command = match controller.take_effects().pop() {
        Some(SessionEffect::SendReply(command)) => command,
        other => panic!("expected reply, got {other:?}"),
    };

    controller.settle_reply(&command, Err(GatewayError::Unauthorized("expired".into())));

    assert!(matches!(
        recorder.notices().as_slice(),
        [Notice::ReplyFailed { .. }]
    ));
    assert_eq!(controller.playback_state(), PlaybackState::Playing);
}

#[test]
fn test_reply_without_session_is_refused() {
    let (mut controller, _) = controller(0);
    assert_eq!(
        controller.send_reply("a1", "hi"),
        Err(GlimpseError::NoActiveSession)
    );
}
