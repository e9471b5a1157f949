//! Pathwise CLI Application
//!
//! Command-line interface and MCP server for the Pathwise career roadmap
//! engine.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, PathwiseMcpServer};
use pathwise_core::{NavigatorBuilder, Thresholds};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        in_memory,
        no_color,
        missed_threshold,
        ahead_threshold,
        hours_change_threshold,
        command,
    } = Args::parse();

    let defaults = Thresholds::default();
    let thresholds = Thresholds {
        missed_percent: missed_threshold.unwrap_or(defaults.missed_percent),
        ahead_percent: ahead_threshold.unwrap_or(defaults.ahead_percent),
        hours_change_percent: hours_change_threshold.unwrap_or(defaults.hours_change_percent),
        ..defaults
    };

    let mut builder = NavigatorBuilder::new()
        .with_database_path(database_file)
        .with_thresholds(thresholds)
        .fallback_to_memory(true);
    if in_memory {
        builder = builder.in_memory();
    }
    let navigator = builder
        .build()
        .await
        .context("Failed to initialize navigator")?;

    info!("Pathwise started ({} store)", navigator.backend());

    let cli = Cli::new(navigator, TerminalRenderer::new(!no_color));
    match command {
        User { command } => cli.handle_user_command(command).await,
        Roadmap { command } => cli.handle_roadmap_command(command).await,
        Task { command } => cli.handle_task_command(command).await,
        Progress(args) => cli.show_progress(&args.into()).await,
        Evaluate(args) => cli.evaluate(args).await,
        Rebalance(args) => cli.rebalance(args).await,
        Events => cli.list_life_events(),
        Serve => {
            info!("Starting Pathwise MCP server");
            run_stdio_server(PathwiseMcpServer::new(cli.into_navigator()))
                .await
                .context("MCP server failed")
        }
    }
}
