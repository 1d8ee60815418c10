//! Stride office reference runtime demo CLI.
//!
//! Runs the scripted office scenarios, or sends one query to a real
//! OpenAI-compatible model with the office tools attached.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- book-meeting
//!   cargo run -p demo -- tool-budget
//!   cargo run -p demo -- tool-failure
//!   cargo run -p demo -- scope-restriction
//!   cargo run -p demo -- operator-rule
//!   OPENAI_API_KEY=... cargo run -p demo -- ask "Book a meeting with Dana tomorrow within 3 tool calls"

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use stride_contracts::error::StrideResult;
use stride_core::traits::{QueryInterpreter, ToolDispatcher};
use stride_gateway::{ModelInterpreter, OpenAiGateway};
use stride_interpret::RuleInterpreter;
use stride_ref_office::{
    build_registry, print_outcome,
    scenarios::{book_meeting, operator_rule, scope_restriction, tool_budget, tool_failure},
    OfficeConfig, OfficeRuntime,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Stride: a constraint-aware agent loop, shown on an office assistant.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Stride office reference runtime demo",
    long_about = "Runs stride office scenarios showing tool use, failure recovery,\n\
                  request constraints, operator rules, and trace integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scripted scenario in sequence.
    RunAll,
    /// Scenario 1: book a meeting with two tool calls.
    BookMeeting,
    /// Scenario 2: abort when the tool-call budget runs out.
    ToolBudget,
    /// Scenario 3: observe a schema violation and recover.
    ToolFailure,
    /// Scenario 4: abort on a tool the user ruled out.
    ScopeRestriction,
    /// Scenario 5: abort on a tool the deployment denies.
    OperatorRule,
    /// Send one query to a live model with the office tools.
    Ask {
        /// The request, in plain language.
        query: String,

        /// TOML file with `[limits]`, `[[rules]]` and `[gateway]`.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Let the model extract intent and constraints too.
        #[arg(long)]
        model_interpreter: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug to watch every loop transition.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all().await,
        Command::BookMeeting => book_meeting::run_scenario().await.map(drop),
        Command::ToolBudget => tool_budget::run_scenario().await.map(drop),
        Command::ToolFailure => tool_failure::run_scenario().await.map(drop),
        Command::ScopeRestriction => scope_restriction::run_scenario().await.map(drop),
        Command::OperatorRule => operator_rule::run_scenario().await.map(drop),
        Command::Ask {
            query,
            config,
            model_interpreter,
        } => ask(&query, config, model_interpreter).await,
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_all() -> StrideResult<()> {
    book_meeting::run_scenario().await?;
    tool_budget::run_scenario().await?;
    tool_failure::run_scenario().await?;
    scope_restriction::run_scenario().await?;
    operator_rule::run_scenario().await?;
    Ok(())
}

// ── Live model ────────────────────────────────────────────────────────────────

async fn ask(query: &str, config: Option<PathBuf>, model_interpreter: bool) -> StrideResult<()> {
    let config = match config {
        Some(path) => OfficeConfig::from_file(&path)?,
        None => OfficeConfig::default(),
    };

    let registry = build_registry()?;
    let gateway = Arc::new(OpenAiGateway::new(&config.gateway, registry.specs())?);
    let interpreter: Arc<dyn QueryInterpreter> = if model_interpreter {
        Arc::new(ModelInterpreter::new(&config.gateway)?)
    } else {
        Arc::new(RuleInterpreter::new())
    };

    let runtime = OfficeRuntime::new(interpreter, gateway, registry, config.policy);

    // Ctrl-C cancels the run; the partial trajectory is still printed.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling");
            on_signal.cancel();
        }
    });

    println!("=== Live query ===");
    println!("  Query:       {query}");
    let outcome = runtime.run_with_cancel(query, &cancel).await?;
    print_outcome(&outcome, runtime.trace());
    println!();

    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Stride: constraint-aware agent loop");
    println!("Office Reference Demo");
    println!("===================================");
    println!();
    println!("Per iteration:");
    println!("  [1] Guard checks step budget and time limit before asking the model");
    println!("  [2] Model returns a tool invocation or a final answer");
    println!("  [3] Guard checks scope, tool-call budget and operator rules before dispatch");
    println!("  [4] Registry validates arguments, runs the tool, validates the output");
    println!("  [5] Step appended to the trajectory and the SHA-256 trace chain");
    println!();
}
