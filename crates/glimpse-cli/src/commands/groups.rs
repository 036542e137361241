use super::source::SourceArgs;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use glimpse_core::engagement::EngagementGateway;

#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(flatten)]
    source: SourceArgs,
}

pub async fn run(args: GroupsArgs) -> Result<()> {
    let gateway = args.source.gateway()?;
    let groups = gateway
        .fetch_eligible_story_groups(&args.source.viewer)
        .await?;

    if groups.is_empty() {
        println!("{}", "No stories to watch".bright_black());
        return Ok(());
    }

    for (index, group) in groups.iter().enumerate() {
        println!(
            "{} {} ({})",
            format!("[{}]", index).bright_black(),
            group.author.display_name.bright_magenta(),
            group.author.id
        );
        for story in &group.stories {
            println!(
                "    {} {:?} {}",
                story.id.bright_blue(),
                story.media_kind,
                story.created_at.format("%H:%M")
            );
        }
    }
    Ok(())
}
