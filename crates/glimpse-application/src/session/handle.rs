use super::command::SessionCommand;
use glimpse_core::engagement::LikeEntry;
use glimpse_core::error::{GlimpseError, Result};
use glimpse_core::session::{SessionId, SessionSnapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Host-facing input surface of an open story session.
///
/// Gestures are fire-and-forget and are applied in the order they are sent.
/// Once the session has closed they are silently dropped. Dropping the handle
/// disposes the session.
#[derive(Debug)]
pub struct StorySessionHandle {
    session_id: SessionId,
    commands: mpsc::UnboundedSender<SessionCommand>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StorySessionHandle {
    pub(crate) fn new(
        session_id: SessionId,
        commands: mpsc::UnboundedSender<SessionCommand>,
        shutdown: CancellationToken,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            session_id,
            commands,
            shutdown,
            task: Some(task),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn hold_start(&self) {
        self.send(SessionCommand::HoldStart);
    }

    pub fn hold_end(&self) {
        self.send(SessionCommand::HoldEnd);
    }

    pub fn tap_forward(&self) {
        self.send(SessionCommand::TapForward);
    }

    pub fn tap_backward(&self) {
        self.send(SessionCommand::TapBackward);
    }

    pub fn ad_completed(&self) {
        self.send(SessionCommand::AdCompleted);
    }

    pub fn close(&self) {
        self.send(SessionCommand::Close);
    }

    /// Flips the like on `story_id` and returns the optimistic entry.
    ///
    /// # Errors
    ///
    /// [`GlimpseError::SessionClosed`] once the session is gone, otherwise
    /// whatever the controller refuses the toggle with.
    pub async fn toggle_like(&self, story_id: &str) -> Result<LikeEntry> {
        let (reply, response) = oneshot::channel();
        self.request(SessionCommand::ToggleLike {
            story_id: story_id.to_string(),
            reply,
        })?;
        response.await.map_err(|_| GlimpseError::SessionClosed)?
    }

    /// Queues a reply to the author of `story_id`.
    ///
    /// Local validation errors are returned here. Delivery results arrive
    /// later as a notice.
    pub async fn send_reply(&self, story_id: &str, text: &str) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.request(SessionCommand::SendReply {
            story_id: story_id.to_string(),
            text: text.to_string(),
            reply,
        })?;
        response.await.map_err(|_| GlimpseError::SessionClosed)?
    }

    /// Current session view, or `None` once the session has closed.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.request(SessionCommand::Snapshot(reply)).ok()?;
        response.await.ok().flatten()
    }

    /// Tears the session down and cancels its clock without waiting.
    pub fn dispose(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Waits until the session has closed, by any means.
    pub async fn closed(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(target: "story_session", "Session task ended abnormally: {}", e);
            }
        }
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!(target: "story_session", "Input for closed session {} dropped", self.session_id);
        }
    }

    fn request(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| GlimpseError::SessionClosed)
    }
}

impl Drop for StorySessionHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
