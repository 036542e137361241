use super::command::{SessionCommand, SessionEvent};
use super::ticker::spawn_ticker;
use glimpse_core::engagement::{EngagementGateway, GatewayResult, LikeEntry};
use glimpse_core::session::{LikeCommand, SessionEffect, StorySessionController};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "story_session";

/// Event loop of one open session.
///
/// Owns the controller and applies host commands, clock ticks and gateway
/// outcomes strictly one at a time. Gateway calls run on their own tasks and
/// report back through the event channel, so playback never waits on them.
/// Like writes go through a single writer task so the store sees them in the
/// order they were issued.
pub(crate) struct SessionRuntime {
    controller: StorySessionController,
    gateway: Arc<dyn EngagementGateway>,
    like_writes_tx: mpsc::UnboundedSender<LikeCommand>,
    like_writes_rx: Option<mpsc::UnboundedReceiver<LikeCommand>>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    shutdown: CancellationToken,
}

impl SessionRuntime {
    /// `controller` must already hold an open session.
    pub(crate) fn new(
        controller: StorySessionController,
        gateway: Arc<dyn EngagementGateway>,
        commands: mpsc::UnboundedReceiver<SessionCommand>,
        shutdown: CancellationToken,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (like_writes_tx, like_writes_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            gateway,
            like_writes_tx,
            like_writes_rx: Some(like_writes_rx),
            commands,
            events_tx,
            events_rx,
            shutdown,
        }
    }

    pub(crate) async fn run(mut self) {
        if let Some(schedule) = self.controller.clock_schedule() {
            let period = Duration::from_millis(self.controller.config().tick_interval_ms);
            spawn_ticker(period, schedule, self.events_tx.clone());
        }
        if let Some(like_writes) = self.like_writes_rx.take() {
            spawn_like_writer(
                Arc::clone(&self.gateway),
                like_writes,
                self.events_tx.clone(),
            );
        }
        self.dispatch_effects();

        while self.controller.is_active() {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    tracing::debug!(target: LOG_TARGET, "Session disposed by host");
                    self.controller.dispose();
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => self.controller.dispose(),
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
            self.dispatch_effects();
        }

        // Drop whatever arrives for the torn-down session.
        self.controller.dispose();
        tracing::debug!(target: LOG_TARGET, "Session runtime finished");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::HoldStart => self.controller.hold_start(),
            SessionCommand::HoldEnd => self.controller.hold_end(),
            SessionCommand::TapForward => self.controller.tap_forward(),
            SessionCommand::TapBackward => self.controller.tap_backward(),
            SessionCommand::AdCompleted => self.controller.ad_completed(),
            SessionCommand::ToggleLike { story_id, reply } => {
                let _ = reply.send(self.controller.toggle_like(&story_id));
            }
            SessionCommand::SendReply {
                story_id,
                text,
                reply,
            } => {
                let _ = reply.send(self.controller.send_reply(&story_id, &text));
            }
            SessionCommand::Close => self.controller.close(),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
            }
        }
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Tick => self.controller.tick(),
            SessionEvent::LikeStateLoaded {
                session_id,
                story_id,
                result,
            } => self
                .controller
                .like_state_loaded(&session_id, &story_id, result),
            SessionEvent::LikeSettled { command, result } => {
                self.controller.settle_like(&command, result)
            }
            SessionEvent::ReplySettled { command, result } => {
                self.controller.settle_reply(&command, result)
            }
        }
    }

    /// Hands like writes to the writer task and starts a background task for
    /// every other effect the controller queued.
    fn dispatch_effects(&mut self) {
        for effect in self.controller.take_effects() {
            let gateway = Arc::clone(&self.gateway);
            let events = self.events_tx.clone();

            match effect {
                SessionEffect::LoadLikeState {
                    session_id,
                    story_id,
                    viewer_id,
                } => {
                    tokio::spawn(async move {
                        let result = fetch_like_entry(gateway.as_ref(), &story_id, &viewer_id).await;
                        // The session may have closed in the meantime.
                        let _ = events.send(SessionEvent::LikeStateLoaded {
                            session_id,
                            story_id,
                            result,
                        });
                    });
                }
                SessionEffect::WriteLike(command) => {
                    if self.like_writes_tx.send(command).is_err() {
                        tracing::warn!(target: LOG_TARGET, "Like writer stopped, write dropped");
                    }
                }
                SessionEffect::SendReply(command) => {
                    tokio::spawn(async move {
                        let result = gateway
                            .send_direct_message(
                                &command.sender_id,
                                &command.recipient_id,
                                &command.text,
                            )
                            .await;
                        let _ = events.send(SessionEvent::ReplySettled { command, result });
                    });
                }
            }
        }
    }
}

async fn fetch_like_entry(
    gateway: &dyn EngagementGateway,
    story_id: &str,
    viewer_id: &str,
) -> GatewayResult<LikeEntry> {
    let (liked, count) = tokio::join!(
        gateway.fetch_like_state(story_id, viewer_id),
        gateway.fetch_like_count(story_id)
    );
    Ok(LikeEntry {
        liked: liked?,
        count: count?,
    })
}

/// Applies like writes one after another.
///
/// Writes still queued when the session closes are carried out; their
/// outcomes are dropped with the event channel.
fn spawn_like_writer(
    gateway: Arc<dyn EngagementGateway>,
    mut commands: mpsc::UnboundedReceiver<LikeCommand>,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            let result = write_like(gateway.as_ref(), &command).await;
            let _ = events.send(SessionEvent::LikeSettled { command, result });
        }
    })
}

async fn write_like(gateway: &dyn EngagementGateway, command: &LikeCommand) -> GatewayResult<()> {
    gateway
        .set_liked(
            &command.story_id,
            &command.viewer_id,
            command.mutation.target(),
        )
        .await
}
