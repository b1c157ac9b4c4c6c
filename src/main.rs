mod actions;
mod api;
mod app;
mod cache;
mod config;
mod dispatch;
mod logging;
mod menu;
mod selector;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use api::TrackerClient;
use config::Config;
use selector::RofiSelector;

#[derive(Parser)]
#[command(name = "trackmenu", version, about = "Pop-up menu for time trackers")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the tracker menu (default)
    Menu,
    /// Print the running tracker, or nothing when idle
    Status,
    /// Re-run the issue export and replace the local issue cache
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = Config::load(cli.config.as_deref())?;

    let result = run(cli.command.unwrap_or(Command::Menu), &config).await;
    if let Err(e) = &result {
        tracing::error!("invocation failed: {e:#}");
    }
    result
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Menu => {
            let client = TrackerClient::new(config)?;
            let selector = RofiSelector::new(&config.selector);
            app::run_menu(config, &client, &selector).await?;
        }
        Command::Status => {
            let client = TrackerClient::new(config)?;
            if let Some(line) = app::status_line(config, &client).await? {
                println!("{line}");
            }
        }
        Command::Refresh => actions::refresh_issues(config)?,
    }
    Ok(())
}
