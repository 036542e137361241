use glimpse_core::engagement::{GatewayResult, LikeEntry, MessageId};
use glimpse_core::error::Result;
use glimpse_core::session::{LikeCommand, ReplyCommand, SessionId, SessionSnapshot};
use glimpse_core::story::StoryId;
use tokio::sync::oneshot;

/// Input sent by a [`StorySessionHandle`](super::StorySessionHandle).
#[derive(Debug)]
pub(crate) enum SessionCommand {
    HoldStart,
    HoldEnd,
    TapForward,
    TapBackward,
    AdCompleted,
    ToggleLike {
        story_id: StoryId,
        reply: oneshot::Sender<Result<LikeEntry>>,
    },
    SendReply {
        story_id: StoryId,
        text: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Close,
    Snapshot(oneshot::Sender<Option<SessionSnapshot>>),
}

/// Input produced inside the runtime: clock ticks and gateway outcomes.
#[derive(Debug)]
pub(crate) enum SessionEvent {
    Tick,
    LikeStateLoaded {
        session_id: SessionId,
        story_id: StoryId,
        result: GatewayResult<LikeEntry>,
    },
    LikeSettled {
        command: LikeCommand,
        result: GatewayResult<()>,
    },
    ReplySettled {
        command: ReplyCommand,
        result: GatewayResult<MessageId>,
    },
}
