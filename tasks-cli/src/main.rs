//! # tasks
//!
//! Command-line host for offline-tasks.
//!
//! ## Commands
//!
//! - `add`: Create a task
//! - `list`: Show tasks
//! - `toggle`: Flip a task between active and completed
//! - `edit`: Change a task's text
//! - `delete`: Remove a task
//! - `sync`: Replay changes made while offline
//! - `status`: Show connectivity and queue state
//! - `session`: Interactive session with live connectivity monitoring
//!
//! ## Example
//!
//! ```bash
//! # Work offline
//! tasks --offline add "buy milk"
//! tasks --offline toggle 1760000000000
//!
//! # Back online: replay queued changes
//! tasks sync
//!
//! # Long-running session (probes every 3s, syncs on reconnect)
//! tasks session
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasks_client::Config;
use tasks_types::{Filter, TaskId};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod console;

use commands::{add, delete, edit, list, session, status, sync, toggle, Env};

/// Offline-first task list.
#[derive(Parser, Debug)]
#[command(name = "tasks")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: tasks.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for tasks and the pending-change queue
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip connectivity checks and work offline
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a task
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show tasks
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(long, short, default_value = "all")]
        filter: Filter,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id
        id: TaskId,
    },

    /// Change a task's text
    Edit {
        /// Task id
        id: TaskId,

        /// New text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove a task
    Delete {
        /// Task id
        id: TaskId,
    },

    /// Replay changes made while offline
    Sync,

    /// Show connectivity and queue state
    Status,

    /// Interactive session with live connectivity monitoring
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Session));

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config::default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let env = Env {
        config,
        data_dir,
        offline: cli.offline,
    };

    match cli.command {
        Commands::Add { text } => add::run(&env, &text.join(" ")).await?,
        Commands::List { filter, json } => list::run(&env, filter, json).await?,
        Commands::Toggle { id } => toggle::run(&env, id).await?,
        Commands::Edit { id, text } => edit::run(&env, id, &text.join(" ")).await?,
        Commands::Delete { id } => delete::run(&env, id).await?,
        Commands::Sync => sync::run(&env).await?,
        Commands::Status => status::run(&env).await?,
        Commands::Session => session::run(&env).await?,
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG`. One-shot commands only show
/// warnings by default; the session also shows connectivity and sync info.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
