//! Interactive session.
//!
//! Reads one command per line from stdin. The connectivity monitor probes
//! in the background and the store replays queued changes whenever the
//! connection comes back.

use anyhow::{Context, Result};
use std::sync::Arc;
use tasks_types::{Command, Filter, TaskId};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{build_monitor, open_store, Env};
use crate::console::{format_view, ConsolePresenter};

const HELP: &str = "\
Commands:
  add <text>          create a task
  toggle <id>         flip completed
  edit <id>           start editing a task
  edit <id> <text>    replace a task's text
  cancel              stop editing
  delete <id>         remove a task
  filter <name>       all, active or completed
  sync                replay queued changes now
  offline             simulate losing the connection
  online              report the connection is back (probes first)
  list                redraw the list
  help                show this help
  quit                leave the session";

/// Errors from parsing one line of session input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The first word names no command.
    #[error("unknown command: {0} (type 'help')")]
    UnknownCommand(String),

    /// The command needs an argument that was not given.
    #[error("{command} needs {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// What was missing.
        argument: &'static str,
    },

    /// The argument is not a task id.
    #[error("invalid task id: {0}")]
    InvalidId(String),

    /// The argument is not a filter name.
    #[error("unknown filter: {0} (expected all, active or completed)")]
    InvalidFilter(String),
}

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// Hand a command to the store.
    Store(Command),
    /// Passive offline signal.
    Offline,
    /// Passive online signal.
    Online,
    /// Redraw the list.
    List,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Empty,
}

impl SessionInput {
    /// Parse one line.
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let input = match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "add" => {
                let text = required(rest, "add", "task text")?;
                Self::Store(Command::Create { text: text.into() })
            }
            "toggle" => Self::Store(Command::Toggle {
                id: parse_id(required(rest, "toggle", "a task id")?)?,
            }),
            "delete" | "rm" => Self::Store(Command::Delete {
                id: parse_id(required(rest, "delete", "a task id")?)?,
            }),
            "edit" => {
                let args = required(rest, "edit", "a task id")?;
                let (id, text) = match args.split_once(char::is_whitespace) {
                    Some((id, text)) => (id, text.trim()),
                    None => (args, ""),
                };
                let id = parse_id(id)?;
                if text.is_empty() {
                    Self::Store(Command::BeginEdit { id })
                } else {
                    Self::Store(Command::Edit {
                        id,
                        text: text.into(),
                    })
                }
            }
            "cancel" => Self::Store(Command::CancelEdit),
            "filter" => {
                let name = required(rest, "filter", "a filter name")?;
                let filter = name
                    .parse::<Filter>()
                    .map_err(|_| SessionError::InvalidFilter(name.into()))?;
                Self::Store(Command::SetFilter { filter })
            }
            "sync" => Self::Store(Command::Sync),
            "offline" => Self::Offline,
            "online" => Self::Online,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(SessionError::UnknownCommand(other.into())),
        };
        Ok(input)
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, SessionError> {
    if rest.is_empty() {
        Err(SessionError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn parse_id(s: &str) -> Result<TaskId, SessionError> {
    s.parse().map_err(|_| SessionError::InvalidId(s.into()))
}

/// Run the interactive session until `quit` or end of input.
pub async fn run(env: &Env) -> Result<()> {
    let store = open_store(env, ConsolePresenter::live()).await?;
    let monitor = Arc::new(build_monitor(env)?);

    let driver = monitor.spawn_sync_driver(Arc::clone(&store));
    let probing = if env.offline {
        tracing::info!("Starting offline; use 'online' to probe");
        None
    } else {
        Some(monitor.spawn())
    };

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match SessionInput::parse(&line) {
            Ok(SessionInput::Store(command)) => store.dispatch(command).await,
            Ok(SessionInput::Offline) => monitor.report_offline(),
            Ok(SessionInput::Online) => {
                monitor.report_online().await;
                if !monitor.is_online() {
                    println!("Remote unreachable, still offline");
                }
            }
            Ok(SessionInput::List) => print!("{}", format_view(&store.view().await)),
            Ok(SessionInput::Help) => println!("{}", HELP),
            Ok(SessionInput::Quit) => break,
            Ok(SessionInput::Empty) => {}
            Err(e) => println!("{}", e),
        }
    }

    if let Some(probing) = probing {
        probing.abort();
    }
    driver.abort();
    store.flush().await;

    let queued = store.queue_len().await;
    if queued > 0 {
        println!("{} change(s) will sync next time you are online", queued);
    }
    Ok(())
}
