//! Remove a task.

use anyhow::Result;
use tasks_types::TaskId;

use super::{connect_once, finish, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the delete command.
pub async fn run(env: &Env, id: TaskId) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    if store.task(id).await.is_none() {
        anyhow::bail!("No task with id {}", id);
    }
    connect_once(env, &store).await?;

    if let Some(task) = store.delete_task(id).await {
        println!("Deleted task {}: {}", task.id, task.text);
    }

    finish(&store).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use tasks_client::MutationAction;
    use tempfile::tempdir;

    #[tokio::test]
    async fn delete_offline_queues_delete() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), true);
        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();
        let task = store.create_task("gone soon").await.unwrap();
        drop(store);

        run(&env, task.id).await.unwrap();

        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();
        assert!(store.tasks().await.is_empty());
        let queue = store.queue().await;
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[1].action, MutationAction::Delete);
    }

    #[tokio::test]
    async fn delete_unknown_id_fails() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), true);

        assert!(run(&env, TaskId::new(5)).await.is_err());
    }
}
