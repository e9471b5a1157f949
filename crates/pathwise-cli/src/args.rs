use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    EvaluateArgs, ProgressArgs, RebalanceArgs, RoadmapCommands, TaskCommands, UserCommands,
};

/// Main command-line interface for Pathwise
///
/// Pathwise keeps a versioned, week-by-week learning roadmap towards a target
/// role. It tracks task completion against the expected pace and rebuilds the
/// roadmap when progress, available hours or life circumstances change. The
/// same operations are exposed to AI assistants through an MCP server.
#[derive(Parser)]
#[command(version, about, name = "pw")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/pathwise/pathwise.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Keep all state in memory for this invocation
    #[arg(long, global = true, conflicts_with = "database_file")]
    pub in_memory: bool,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Percentage of skipped tasks that triggers a rebalance (default 30)
    #[arg(long, global = true, value_name = "PERCENT")]
    pub missed_threshold: Option<f64>,

    /// Points above the expected completion that count as ahead (default 20)
    #[arg(long, global = true, value_name = "PERCENT")]
    pub ahead_threshold: Option<f64>,

    /// Relative change in weekly hours that triggers a rebalance (default 25)
    #[arg(long, global = true, value_name = "PERCENT")]
    pub hours_change_threshold: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Pathwise CLI
///
/// - `user`: learner profiles
/// - `roadmap`: the active roadmap, its history and the week pointer
/// - `task`: task listing and completion
/// - `progress`, `evaluate`, `rebalance`: pace tracking and adaptation
/// - `serve`: MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage learner profiles
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Work with the active roadmap
    #[command(alias = "r")]
    Roadmap {
        #[command(subcommand)]
        command: RoadmapCommands,
    },
    /// Track tasks of the active roadmap
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show progress against the expected pace
    #[command(alias = "p")]
    Progress(ProgressArgs),
    /// Check whether the roadmap should be rebalanced
    #[command(alias = "e")]
    Evaluate(EvaluateArgs),
    /// Rebuild the active roadmap as a new version
    Rebalance(RebalanceArgs),
    /// List the life events accepted by `rebalance --life-event`
    Events,
    /// Start the MCP server
    Serve,
}
