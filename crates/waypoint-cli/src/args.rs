use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ContextCommands, RunArgs, ToolCommands};

/// Run natural-language intents as supervised tool plans
///
/// Waypoint plans an intent into steps, binds each step to a registered
/// tool, and executes the steps one by one. Arguments come from the
/// conversation, and a run pauses when a step needs more input. Completed
/// plans are stored and can be reused for the same intent later.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waypoint/waypoint.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory of tool manifests (*.json). Overrides WAYPOINT_TOOLS_DIR
    #[arg(long, global = true)]
    pub tools_dir: Option<PathBuf>,

    /// Report a halted run instead of prompting for missing input
    #[arg(long, global = true)]
    pub batch: bool,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Plan and execute an intent
    #[command(alias = "r")]
    Run(RunArgs),
    /// Inspect stored plan contexts
    #[command(alias = "c")]
    Contexts {
        #[command(subcommand)]
        command: ContextCommands,
    },
    /// Inspect registered tools
    #[command(alias = "t")]
    Tools {
        #[command(subcommand)]
        command: ToolCommands,
    },
}
