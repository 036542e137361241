use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use glimpse_infrastructure::{InMemoryEngagementGateway, SocialFixture};
use std::path::PathBuf;

/// Where the story data comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON fixture to seed the store with; the built-in demo is used otherwise
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Account watching the stories
    #[arg(long, default_value = "you")]
    pub viewer: String,
}

impl SourceArgs {
    pub fn gateway(&self) -> Result<InMemoryEngagementGateway> {
        let fixture = match &self.fixture {
            Some(path) => SocialFixture::load_json(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?,
            None => SocialFixture::demo(Utc::now()),
        };
        Ok(InMemoryEngagementGateway::from_fixture(fixture))
    }
}
