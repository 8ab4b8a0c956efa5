//! Create a task.

use anyhow::Result;

use super::{connect_once, finish, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the add command.
pub async fn run(env: &Env, text: &str) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    connect_once(env, &store).await?;

    match store.create_task(text).await {
        Some(task) => println!("Added task {}", task.id),
        None => println!("Nothing to add: task text is empty"),
    }

    finish(&store).await;
    Ok(())
}
