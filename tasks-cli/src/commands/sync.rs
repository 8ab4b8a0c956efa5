//! Replay changes made while offline.

use anyhow::Result;

use super::{connect_once, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the sync command.
///
/// Going online starts the drain; its outcome is printed as a
/// notification once the queue has been replayed.
pub async fn run(env: &Env) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;
    let queued = store.queue_len().await;

    if env.offline {
        println!("Offline: {} change(s) waiting", queued);
        return Ok(());
    }
    if queued == 0 {
        println!("Nothing to sync");
        return Ok(());
    }

    if !connect_once(env, &store).await? {
        println!("Remote unreachable: {} change(s) waiting", queued);
        return Ok(());
    }
    store.flush().await;

    let left = store.queue_len().await;
    if left > 0 {
        println!("{} change(s) still waiting", left);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use tasks_client::SyncStatus;
    use tempfile::tempdir;

    async fn queue_offline(env: &Env, texts: &[&str]) {
        let store = open_store(env, ConsolePresenter::quiet()).await.unwrap();
        for text in texts {
            store.create_task(text).await.unwrap();
        }
    }

    #[tokio::test]
    async fn sync_drains_the_queue() {
        let dir = tempdir().unwrap();
        let offline = testing::env(dir.path(), true);
        queue_offline(&offline, &["a", "b"]).await;

        let online = testing::env(dir.path(), false);
        run(&online).await.unwrap();

        let store = open_store(&online, ConsolePresenter::quiet()).await.unwrap();
        assert_eq!(store.queue_len().await, 0);
        assert!(store
            .tasks()
            .await
            .iter()
            .all(|t| t.sync_status == SyncStatus::Synced));
    }

    #[tokio::test]
    async fn sync_offline_keeps_the_queue() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), true);
        queue_offline(&env, &["a"]).await;

        run(&env).await.unwrap();

        let store = open_store(&env, ConsolePresenter::quiet()).await.unwrap();
        assert_eq!(store.queue_len().await, 1);
    }

    #[tokio::test]
    async fn sync_failure_keeps_the_queue() {
        let dir = tempdir().unwrap();
        let offline = testing::env(dir.path(), true);
        queue_offline(&offline, &["a"]).await;

        let mut online = testing::env(dir.path(), false);
        online.config.remote.failure_rate = 1.0;
        run(&online).await.unwrap();

        let store = open_store(&online, ConsolePresenter::quiet()).await.unwrap();
        assert_eq!(store.queue_len().await, 1);
        assert_eq!(store.tasks().await[0].sync_status, SyncStatus::Pending);
    }

    #[tokio::test]
    async fn sync_with_empty_queue() {
        let dir = tempdir().unwrap();
        let env = testing::env(dir.path(), false);

        assert!(run(&env).await.is_ok());
    }
}
