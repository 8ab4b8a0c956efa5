//! HTTP remote backed by a REST task API.
//!
//! | Action | Request |
//! |--------|---------|
//! | create | `POST {base}/tasks` with the task snapshot |
//! | update | `PUT {base}/tasks/{id}` with the task snapshot |
//! | delete | `DELETE {base}/tasks/{id}` (404 counts as success) |

use super::RemoteSync;
use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tasks_types::{MutationAction, MutationData, Task, TaskId};

/// REST client for the remote task API.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    /// Create a client for `base_url`, bounding every request by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }

    fn snapshot(action: MutationAction, data: &MutationData) -> Result<&Task, RemoteError> {
        data.snapshot().ok_or_else(|| RemoteError::InvalidPayload {
            action: action.to_string(),
        })
    }
}

fn request_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Request(e.to_string())
    }
}

#[async_trait]
impl RemoteSync for HttpRemote {
    async fn apply(&self, action: MutationAction, data: &MutationData) -> Result<(), RemoteError> {
        let request = match action {
            MutationAction::Create => self
                .client
                .post(self.collection_url())
                .json(Self::snapshot(action, data)?),
            MutationAction::Update => self
                .client
                .put(self.item_url(data.task_id()))
                .json(Self::snapshot(action, data)?),
            MutationAction::Delete => self.client.delete(self.item_url(data.task_id())),
        };

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();

        if status.is_success() || (action == MutationAction::Delete && status == StatusCode::NOT_FOUND)
        {
            tracing::debug!("Remote accepted {} of task {}", action, data.task_id());
            Ok(())
        } else {
            Err(RemoteError::Rejected {
                action: action.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_ignore_trailing_slash() {
        let remote = HttpRemote::new("http://localhost:9/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.collection_url(), "http://localhost:9/api/tasks");
        assert_eq!(
            remote.item_url(TaskId::new(42)),
            "http://localhost:9/api/tasks/42"
        );
    }

    #[tokio::test]
    async fn update_without_snapshot_is_invalid() {
        let remote = HttpRemote::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let result = remote
            .apply(
                MutationAction::Update,
                &MutationData::Reference { id: TaskId::new(1) },
            )
            .await;
        assert!(matches!(result, Err(RemoteError::InvalidPayload { .. })));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error_value() {
        // Port 9 (discard) is closed on test machines; the call must fail
        // without panicking.
        let remote = HttpRemote::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = remote
            .apply(
                MutationAction::Delete,
                &MutationData::Reference { id: TaskId::new(1) },
            )
            .await;
        assert!(result.is_err());
    }
}
