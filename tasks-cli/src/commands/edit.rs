//! Change a task's text.

use anyhow::Result;
use tasks_types::TaskId;

use super::{connect_once, finish, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the edit command.
pub async fn run(env: &Env, id: TaskId, text: &str) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    if store.task(id).await.is_none() {
        anyhow::bail!("No task with id {}", id);
    }
    connect_once(env, &store).await?;

    match store.edit_task(id, text).await {
        Some(task) => println!("Task {} renamed", task.id),
        None => println!("Task {} unchanged: new text is empty", id),
    }

    finish(&store).await;
    Ok(())
}
