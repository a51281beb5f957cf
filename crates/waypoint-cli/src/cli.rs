//! Command argument wrappers and their handlers.
//!
//! Every subcommand's arguments are a `clap` struct that converts into the
//! matching core parameter type with `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Engine / Memory
//! ```
//!
//! Core parameter types stay free of `clap` attributes, so help text,
//! aliases and defaults can change here without touching `waypoint-core`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::info;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use waypoint_core::{
    AppContextBuilder, ChatMessage, Engine, EngineError, IntentRun, InteractionMode, PassStatus,
    PlanContextMemory, ResultVerifier, Settings, VerifierKind,
    display::{Checkpoints, DeleteResult, PlanContexts, Tools},
    llm::OpenAiCompatibleModel,
    memory::RegistryStepMemory,
    params::{Id, ListContexts, RunIntent},
    planning::ModelPlanner,
    registry::{ProcessToolCaller, ToolRegistry},
    verify::{ModelVerifier, StatusVerifier},
};

use crate::{progress::TerminalProgress, renderer::TerminalRenderer};

/// Plan and execute an intent
///
/// The intent is planned into steps, each step is bound to a registered tool,
/// and the steps run in order. When a step is missing an argument the run
/// pauses and asks for it, unless --batch is given.
#[derive(Args)]
pub struct RunArgs {
    /// What you want done, in plain language
    pub intent: String,
    /// User the run acts for; stored plans and checkpoints are kept per user
    #[arg(long, env = "USER", default_value = "default")]
    pub user: String,
    /// Re-run the latest stored plan for this intent instead of planning anew
    #[arg(long)]
    pub reuse: bool,
}

impl From<RunArgs> for RunIntent {
    fn from(val: RunArgs) -> Self {
        RunIntent {
            intent: val.intent,
            user_id: val.user,
            reuse: val.reuse,
        }
    }
}

/// List stored plan contexts, newest first
#[derive(Args)]
pub struct ListContextsArgs {
    /// Only list plans stored for this user
    #[arg(long)]
    pub user: Option<String>,
}

impl From<ListContextsArgs> for ListContexts {
    fn from(val: ListContextsArgs) -> Self {
        ListContexts { user_id: val.user }
    }
}

/// Show a stored plan context with its steps and results
#[derive(Args)]
pub struct ShowContextArgs {
    /// ID of the plan context to display
    pub id: u64,
}

impl From<ShowContextArgs> for Id {
    fn from(val: ShowContextArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a stored plan context
#[derive(Args)]
pub struct DeleteContextArgs {
    /// ID of the plan context to delete
    pub id: u64,
}

impl From<DeleteContextArgs> for Id {
    fn from(val: DeleteContextArgs) -> Self {
        Id { id: val.id }
    }
}

/// Show step checkpoints recorded since the user's last stored plan
#[derive(Args)]
pub struct CheckpointsArgs {
    /// User whose checkpoints to show
    #[arg(long, env = "USER", default_value = "default")]
    pub user: String,
}

#[derive(Subcommand)]
pub enum ContextCommands {
    /// List stored plan contexts
    #[command(aliases = ["l", "ls"])]
    List(ListContextsArgs),
    /// Show a stored plan context
    #[command(alias = "s")]
    Show(ShowContextArgs),
    /// Delete a stored plan context
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteContextArgs),
    /// Show pending step checkpoints
    Checkpoints(CheckpointsArgs),
}

#[derive(Subcommand)]
pub enum ToolCommands {
    /// List registered tools and their methods
    #[command(aliases = ["l", "ls"])]
    List,
}

/// Command handlers sharing one settings/registry/memory triple.
pub struct Cli {
    settings: Settings,
    registry: Arc<ToolRegistry>,
    memory: Arc<PlanContextMemory>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        settings: Settings,
        registry: Arc<ToolRegistry>,
        memory: Arc<PlanContextMemory>,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            settings,
            registry,
            memory,
            renderer,
        }
    }

    pub async fn handle_run(&self, args: RunArgs) -> Result<()> {
        let params = RunIntent::from(args);
        let engine = self.engine()?;
        let history = vec![ChatMessage::user(params.intent.as_str())];

        if params.reuse {
            let reused = engine
                .reuse_plan_context(&params.intent, &history, &params.user_id)
                .await
                .context("Failed to reuse stored plan")?;
            if let Some(run) = reused {
                return self.follow_run(&engine, run, history, &params.user_id).await;
            }
            info!("No stored plan for \"{}\", planning anew", params.intent);
        }

        let run = engine
            .execute_intent(&params.intent, &history, &params.user_id)
            .await
            .context("Failed to execute intent")?;
        self.follow_run(&engine, run, history, &params.user_id).await
    }

    /// Renders `run` and, in terminal mode, keeps resuming the plan while it
    /// halts for input. An empty reply abandons the run.
    async fn follow_run(
        &self,
        engine: &Engine,
        run: IntentRun,
        mut history: Vec<ChatMessage>,
        user_id: &str,
    ) -> Result<()> {
        self.renderer.render(&run.to_string())?;
        let IntentRun::Executed {
            mut plan,
            mut report,
        } = run
        else {
            return Ok(());
        };

        let mut stdin = BufReader::new(tokio::io::stdin());
        while let PassStatus::NeedInput { index } = report.status {
            if self.settings.interaction_mode == InteractionMode::Batch {
                break;
            }
            let Some(reply) = prompt_line(&mut stdin, index).await? else {
                info!("Run abandoned at step {}", index + 1);
                break;
            };
            history.push(ChatMessage::user(reply));
            report = engine
                .execute_plan(&mut plan, &history, user_id)
                .await
                .context("Failed to resume plan")?;
            self.renderer.render(&report.to_string())?;
        }
        Ok(())
    }

    pub async fn handle_context_command(&self, command: ContextCommands) -> Result<()> {
        match command {
            ContextCommands::List(args) => self.list_contexts(&args.into()).await,
            ContextCommands::Show(args) => self.show_context(&args.into()).await,
            ContextCommands::Delete(args) => self.delete_context(&args.into()).await,
            ContextCommands::Checkpoints(args) => self.show_checkpoints(&args.user).await,
        }
    }

    pub fn handle_tool_command(&self, command: ToolCommands) -> Result<()> {
        match command {
            ToolCommands::List => self
                .renderer
                .render(&Tools(self.registry.iter().collect()).to_string()),
        }
    }

    pub async fn list_contexts(&self, params: &ListContexts) -> Result<()> {
        let contexts = self
            .memory
            .list_plan_contexts(params)
            .await
            .context("Failed to list plan contexts")?;
        self.renderer.render(&PlanContexts(contexts).to_string())
    }

    async fn show_context(&self, params: &Id) -> Result<()> {
        let context = self
            .memory
            .get_plan_context(params)
            .await
            .context("Failed to load plan context")?
            .ok_or(EngineError::PlanContextNotFound { id: params.id })?;
        self.renderer.render(&context.to_string())
    }

    async fn delete_context(&self, params: &Id) -> Result<()> {
        self.memory
            .delete_plan_context(params)
            .await
            .with_context(|| format!("Failed to delete plan context {}", params.id))?;
        self.renderer
            .render(&DeleteResult::new("plan context", params.id).to_string())
    }

    async fn show_checkpoints(&self, user_key: &str) -> Result<()> {
        let checkpoints = self
            .memory
            .list_checkpoints(user_key)
            .await
            .context("Failed to list checkpoints")?;
        self.renderer.render(&Checkpoints(checkpoints).to_string())
    }

    fn engine(&self) -> Result<Engine> {
        let model = Arc::new(OpenAiCompatibleModel::new(
            &self.settings.api_base,
            self.settings.api_key.clone(),
        ));
        let planner = Arc::new(ModelPlanner::new(model.clone(), &self.settings.chat_model));
        let step_memory =
            RegistryStepMemory::new(&self.registry).with_threshold(self.settings.match_threshold);
        let verifier: Arc<dyn ResultVerifier> = match self.settings.verifier {
            VerifierKind::Status => Arc::new(StatusVerifier),
            VerifierKind::Model => Arc::new(ModelVerifier::new(
                model.clone(),
                &self.settings.quality_model,
            )),
        };

        let context = AppContextBuilder::new()
            .with_model(model)
            .with_intent_planner(planner.clone())
            .with_tool_planner(planner)
            .with_step_memory(Arc::new(step_memory))
            .with_plan_contexts(self.memory.clone())
            .with_tool_caller(Arc::new(ProcessToolCaller::new(self.registry.clone())))
            .with_verifier(verifier)
            .with_progress(Arc::new(TerminalProgress::new(self.renderer.is_rich())))
            .with_quality_model(&self.settings.quality_model)
            .build()
            .context("Failed to assemble the engine")?;
        Ok(Engine::new(context))
    }
}

/// Asks for the input step `index` is missing; `None` on an empty line or
/// end of input.
async fn prompt_line(stdin: &mut BufReader<Stdin>, index: usize) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("Input for step {} (empty to stop): ", index + 1).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    if stdin.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}
