use super::script::{ScriptStep, parse_script};
use super::source::SourceArgs;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use glimpse_application::{StorySessionHandle, StorySessionService};
use glimpse_core::auth::AuthContext;
use glimpse_core::config::SessionConfig;
use glimpse_core::engagement::LikeEntry;
use glimpse_core::session::{Notice, SessionObserver};
use glimpse_core::story::StoryGroup;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Index of the story group to start from
    #[arg(long, default_value_t = 0)]
    group: usize,

    /// Make every like and reply write fail
    #[arg(long)]
    fail_writes: bool,

    /// Gestures to replay, e.g. "f,h,w500,r,l,m:hi"
    #[arg(long)]
    script: Option<String>,

    /// Pause between script steps in milliseconds
    #[arg(long, default_value_t = 300)]
    step_ms: u64,

    /// Override the per-story duration in milliseconds
    #[arg(long)]
    story_ms: Option<u64>,
}

/// Prints session signals as they happen.
struct TerminalObserver {
    groups: Vec<StoryGroup>,
}

impl TerminalObserver {
    fn label(&self, group_index: usize, story_index: usize) -> String {
        self.groups
            .get(group_index)
            .and_then(|g| g.get(story_index).map(|s| (g, s)))
            .map(|(g, s)| format!("{} / {}", g.author.display_name, s.id))
            .unwrap_or_else(|| format!("({}, {})", group_index, story_index))
    }
}

impl SessionObserver for TerminalObserver {
    fn on_progress_changed(&self, percent: u8) {
        if percent > 0 && percent % 25 == 0 {
            println!("  {}", format!("{:>3}%", percent).bright_black());
        }
    }

    fn on_cursor_changed(&self, group_index: usize, story_index: usize) {
        println!("{} {}", "▶".green(), self.label(group_index, story_index).bold());
    }

    fn on_ad_visibility_changed(&self, visible: bool) {
        if visible {
            println!("{}", "★ Sponsored".bright_yellow());
        } else {
            println!("{}", "★ Sponsored dismissed".bright_black());
        }
    }

    fn on_ad_countdown_changed(&self, seconds_remaining: u64) {
        println!("  {}", format!("ad ends in {}s", seconds_remaining).bright_black());
    }

    fn on_like_changed(&self, story_id: &str, like: LikeEntry) {
        let heart = if like.liked { "♥".red() } else { "♡".normal() };
        println!("  {} {} ({})", heart, like.count, story_id.bright_black());
    }

    fn on_notice(&self, notice: &Notice) {
        match notice {
            Notice::LikeFailed { story_id, error } => {
                eprintln!("{}", format!("Like on {} failed: {}", story_id, error).red());
            }
            Notice::ReplySent { story_id } => {
                println!("{}", format!("Reply to {} sent", story_id).green());
            }
            Notice::ReplyFailed { story_id, error } => {
                eprintln!("{}", format!("Reply to {} failed: {}", story_id, error).red());
            }
        }
    }

    fn on_session_closed(&self) {
        println!("{}", "■ Session closed".bright_black());
    }
}

pub async fn run(args: PlayArgs, mut config: SessionConfig) -> Result<()> {
    if let Some(story_ms) = args.story_ms {
        config.story_duration_ms = story_ms;
    }
    config.validate()?;

    let steps = match &args.script {
        Some(script) => parse_script(script)?,
        None => Vec::new(),
    };

    let gateway = args.source.gateway()?;
    gateway.set_fail_writes(args.fail_writes);
    let service = StorySessionService::new(
        Arc::new(gateway),
        AuthContext::new(args.source.viewer.clone()),
        config,
    );

    let groups = service.story_groups().await?;
    let observer = Arc::new(TerminalObserver {
        groups: groups.clone(),
    });
    let Some(handle) = service.open(groups, args.group, observer) else {
        println!("{}", "No stories to watch".bright_black());
        return Ok(());
    };

    for step in steps {
        if handle.is_closed() {
            break;
        }
        perform(&handle, step).await;
        tokio::time::sleep(Duration::from_millis(args.step_ms)).await;
    }

    handle.closed().await;
    Ok(())
}

async fn perform(handle: &StorySessionHandle, step: ScriptStep) {
    match step {
        ScriptStep::TapForward => handle.tap_forward(),
        ScriptStep::TapBackward => handle.tap_backward(),
        ScriptStep::HoldStart => handle.hold_start(),
        ScriptStep::HoldEnd => handle.hold_end(),
        ScriptStep::AdCompleted => handle.ad_completed(),
        ScriptStep::Close => handle.close(),
        ScriptStep::Wait(duration) => tokio::time::sleep(duration).await,
        ScriptStep::Snapshot => {
            if let Some(snapshot) = handle.snapshot().await {
                match serde_json::to_string(&snapshot) {
                    Ok(json) => println!("{}", json.bright_black()),
                    Err(e) => tracing::warn!("Failed to render snapshot: {}", e),
                }
            }
        }
        ScriptStep::ToggleLike => {
            let Some(snapshot) = handle.snapshot().await else {
                return;
            };
            if let Err(e) = handle.toggle_like(&snapshot.story_id).await {
                println!("{}", format!("Cannot like: {}", e).yellow());
            }
        }
        ScriptStep::Reply(text) => {
            let Some(snapshot) = handle.snapshot().await else {
                return;
            };
            if let Err(e) = handle.send_reply(&snapshot.story_id, &text).await {
                println!("{}", format!("Cannot reply: {}", e).yellow());
            }
        }
    }
}
