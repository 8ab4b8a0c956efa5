//! Show connectivity and queue state.

use anyhow::Result;

use super::{build_monitor, open_store, Env};
use crate::console::ConsolePresenter;

/// Run the status command.
///
/// Probes to report reachability but never replays the queue.
pub async fn run(env: &Env) -> Result<()> {
    let store = open_store(env, ConsolePresenter::quiet()).await?;

    let connection = if env.offline {
        "offline (forced)"
    } else if build_monitor(env)?.probe().await {
        "online"
    } else {
        "offline"
    };

    let stats = store.stats().await;
    let queued = store.queue_len().await;

    println!("offline-tasks Status");
    println!("====================");
    println!();
    println!("Data dir:    {}", env.data_dir.display());
    println!("Storage:     {:?}", env.config.storage.backend);
    println!("Remote:      {:?}", env.config.remote.backend);
    println!(
        "Probe:       {}",
        env.config
            .connectivity
            .probe_url
            .as_deref()
            .unwrap_or("(none, remote assumed reachable)")
    );
    println!("Connection:  {}", connection);
    println!();
    println!(
        "Tasks:       {} total, {} active, {} completed",
        stats.total, stats.active, stats.completed
    );
    println!("Pending:     {} task(s)", stats.pending);
    println!("Queue:       {} change(s) queued", queued);

    Ok(())
}
