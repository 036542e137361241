//! Story session use case.
//!
//! `StorySessionService` wires the engagement gateway, the viewer's auth
//! context and the session settings into running sessions.

use crate::session::{SessionRuntime, StorySessionHandle};
use glimpse_core::auth::AuthContext;
use glimpse_core::config::SessionConfig;
use glimpse_core::engagement::EngagementGateway;
use glimpse_core::error::Result;
use glimpse_core::session::{AdPolicy, SessionObserver, StorySessionController};
use glimpse_core::story::StoryGroup;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Opens story sessions for one viewer.
///
/// # Thread Safety
///
/// The service is cheap to clone and holds no session state; every session
/// lives on its own task and is reached only through its handle.
#[derive(Clone)]
pub struct StorySessionService {
    gateway: Arc<dyn EngagementGateway>,
    auth: AuthContext,
    config: SessionConfig,
    ad_policy: Option<AdPolicy>,
}

impl StorySessionService {
    pub fn new(gateway: Arc<dyn EngagementGateway>, auth: AuthContext, config: SessionConfig) -> Self {
        Self {
            gateway,
            auth,
            config,
            ad_policy: None,
        }
    }

    /// Overrides the interstitial cadence derived from the config.
    pub fn with_ad_policy(mut self, ad_policy: AdPolicy) -> Self {
        self.ad_policy = Some(ad_policy);
        self
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Story groups the viewer may watch, in display order.
    pub async fn story_groups(&self) -> Result<Vec<StoryGroup>> {
        let groups = self
            .gateway
            .fetch_eligible_story_groups(&self.auth.viewer_id)
            .await?;
        tracing::debug!(
            target: "story_session",
            "Fetched {} story groups for {}",
            groups.len(),
            self.auth.viewer_id
        );
        Ok(groups)
    }

    /// Starts a session on the first story of `groups[group_index]`.
    ///
    /// Returns `None` when the session cannot be populated (no groups or an
    /// invalid index); nothing is spawned in that case. Must be called from
    /// within a tokio runtime.
    pub fn open(
        &self,
        groups: Vec<StoryGroup>,
        group_index: usize,
        observer: Arc<dyn SessionObserver>,
    ) -> Option<StorySessionHandle> {
        let mut controller =
            StorySessionController::new(self.auth.clone(), self.config.clone(), observer);
        if let Some(ad_policy) = self.ad_policy {
            controller = controller.with_ad_policy(ad_policy);
        }

        let session_id = match controller.open(groups, group_index) {
            Ok(session_id) => session_id,
            Err(e) => {
                tracing::debug!(target: "story_session", "Session not opened: {}", e);
                return None;
            }
        };

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let runtime = SessionRuntime::new(
            controller,
            Arc::clone(&self.gateway),
            commands_rx,
            shutdown.clone(),
        );
        let task = tokio::spawn(runtime.run());

        Some(StorySessionHandle::new(session_id, commands_tx, shutdown, task))
    }

    /// Fetches the viewer's eligible groups and opens a session on them.
    pub async fn open_for_viewer(
        &self,
        group_index: usize,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Option<StorySessionHandle>> {
        let groups = self.story_groups().await?;
        Ok(self.open(groups, group_index, observer))
    }
}
