//! Show tasks.

use anyhow::{Context, Result};
use tasks_types::Filter;

use super::{open_store, Env};
use crate::console::{format_view, ConsolePresenter};

/// Run the list command. Read-only: no probe, no sync.
pub async fn run(env: &Env, filter: Filter, json: bool) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    store.set_filter(filter).await;
    let view = store.view().await;

    if json {
        let out = serde_json::to_string_pretty(&view).context("Failed to encode view")?;
        println!("{}", out);
    } else {
        print!("{}", format_view(&view));
    }
    Ok(())
}
