//! Waypoint CLI
//!
//! Runs intents through the plan execution engine and inspects what it
//! stored. Settings come from the environment; global flags override them.

mod args;
mod cli;
mod progress;
mod renderer;

use std::sync::Arc;

use Commands::*;
use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use waypoint_core::{
    InteractionMode, PlanContextMemoryBuilder, Settings, params::ListContexts,
    registry::ToolRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        tools_dir,
        batch,
        no_color,
        command,
    } = Args::parse();

    let mut settings = Settings::from_env().context("Failed to read settings")?;
    if database_file.is_some() {
        settings.database = database_file;
    }
    if tools_dir.is_some() {
        settings.tools_dir = tools_dir;
    }
    if batch {
        settings.interaction_mode = InteractionMode::Batch;
    }

    let registry = match &settings.tools_dir {
        Some(dir) => ToolRegistry::scan_directory(dir)
            .with_context(|| format!("Failed to load tools from {}", dir.display()))?,
        None => ToolRegistry::default(),
    };
    let memory = PlanContextMemoryBuilder::new()
        .with_database_path(settings.database.as_ref())
        .build()
        .await
        .context("Failed to initialize plan context memory")?;

    info!("Waypoint started with {} tool(s)", registry.len());

    let cli = Cli::new(
        settings,
        Arc::new(registry),
        Arc::new(memory),
        TerminalRenderer::new(!no_color),
    );

    match command {
        Some(Run(args)) => cli.handle_run(args).await,
        Some(Contexts { command }) => cli.handle_context_command(command).await,
        Some(Tools { command }) => cli.handle_tool_command(command),
        None => cli.list_contexts(&ListContexts::default()).await,
    }
}
