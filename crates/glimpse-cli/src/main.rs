use anyhow::Result;
use clap::{Parser, Subcommand};
use glimpse_infrastructure::ConfigService;
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "glimpse")]
#[command(about = "glimpse - ephemeral story session player", long_about = None)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story session in the terminal
    Play(commands::play::PlayArgs),
    /// List the story groups a viewer may watch
    Groups(commands::groups::GroupsArgs),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.get_config()?;
    logging::init(&config.logging, cli.json);

    match cli.command {
        Commands::Play(args) => commands::play::run(args, config.session).await?,
        Commands::Groups(args) => commands::groups::run(args).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config_service)?,
            ConfigAction::Init => commands::config::init(&config_service)?,
        },
    }

    Ok(())
}
