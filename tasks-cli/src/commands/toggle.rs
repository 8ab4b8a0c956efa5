//! Flip a task between active and completed.

use anyhow::Result;
use tasks_types::TaskId;

use super::{connect_once, finish, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the toggle command.
pub async fn run(env: &Env, id: TaskId) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    if store.task(id).await.is_none() {
        anyhow::bail!("No task with id {}", id);
    }
    connect_once(env, &store).await?;

    if let Some(task) = store.toggle_task(id).await {
        let state = if task.completed { "completed" } else { "active" };
        println!("Task {} is now {}", task.id, state);
    }

    finish(&store).await;
    Ok(())
}
