//! HTTP reachability probe.

use super::Prober;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Probes a URL with `HEAD`; any success status means reachable.
///
/// Each request carries a `_=<millis>` query parameter so no cache between
/// us and the server can answer on its behalf.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    url: String,
}

impl HttpProber {
    /// Create a prober for `url`, bounding each request by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// URL being probed.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self) -> bool {
        let cache_buster = chrono::Utc::now().timestamp_millis().to_string();
        match self
            .client
            .head(&self.url)
            .query(&[("_", cache_buster.as_str())])
            .send()
            .await
        {
            Ok(response) => {
                let reachable = response.status().is_success();
                if !reachable {
                    tracing::debug!("Probe of {} answered {}", self.url, response.status());
                }
                reachable
            }
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", self.url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_false() {
        let prober = HttpProber::new("http://127.0.0.1:9/ping", Duration::from_millis(500)).unwrap();
        assert!(!prober.probe().await);
    }

    #[test]
    fn keeps_configured_url() {
        let prober = HttpProber::new("http://localhost/ping", Duration::from_secs(1)).unwrap();
        assert_eq!(prober.url(), "http://localhost/ping");
    }
}
