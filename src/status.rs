//! Whether the network is up, and therefore whether fetching makes sense
//!
//! The local network launcher reports its lifecycle on `GET /status` as
//! `{"success": true, "message": "running"}`; any other message
//! ("launching", "stopping", "stopped", ...) means the nodes are not serving.

use crate::config::Config;
use crate::error::{ExplorerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const RUNNING: &str = "running";

#[async_trait]
pub trait NetworkStatus: Send + Sync {
    async fn is_running(&self) -> bool;
}

/// Fixed answer, used when no launcher is configured.
#[derive(Debug, Clone, Copy)]
pub struct StaticStatus(pub bool);

#[async_trait]
impl NetworkStatus for StaticStatus {
    async fn is_running(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LauncherStatus {
    pub success: bool,
    pub message: String,
}

impl LauncherStatus {
    pub fn is_running(&self) -> bool {
        self.success && self.message == RUNNING
    }
}

pub struct HttpStatusProbe {
    http: reqwest::Client,
    url: String,
}

impl HttpStatusProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplorerError::Config(format!("building HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub async fn fetch(&self) -> Result<LauncherStatus> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::UpstreamFetch(format!(
                "status endpoint returned HTTP {}",
                status
            )));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl NetworkStatus for HttpStatusProbe {
    async fn is_running(&self) -> bool {
        match self.fetch().await {
            Ok(status) => status.is_running(),
            Err(e) => {
                warn!(url = %self.url, "network status unavailable: {}", e);
                false
            }
        }
    }
}

/// Probe the configured launcher, or assume running when there is none.
pub fn status_from_config(config: &Config) -> Result<Box<dyn NetworkStatus>> {
    match &config.node.status_url {
        Some(url) => Ok(Box::new(HttpStatusProbe::new(
            url.clone(),
            config.request_timeout(),
        )?)),
        None => Ok(Box::new(StaticStatus(true))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_message_counts() {
        let running = LauncherStatus {
            success: true,
            message: "running".to_string(),
        };
        assert!(running.is_running());

        for message in ["launching", "stopping", "stopped", ""] {
            let status = LauncherStatus {
                success: true,
                message: message.to_string(),
            };
            assert!(!status.is_running(), "{:?}", message);
        }

        let failed = LauncherStatus {
            success: false,
            message: "running".to_string(),
        };
        assert!(!failed.is_running());
    }

    #[tokio::test]
    async fn test_static_status() {
        assert!(StaticStatus(true).is_running().await);
        assert!(!StaticStatus(false).is_running().await);
    }

    #[tokio::test]
    async fn test_unconfigured_status_assumes_running() {
        let status = status_from_config(&Config::default()).unwrap();
        assert!(status.is_running().await);
    }

    #[tokio::test]
    async fn test_unreachable_launcher_is_not_running() {
        // Port 9 (discard) is closed on test hosts; the connection is refused.
        let probe = HttpStatusProbe::new("http://127.0.0.1:9/status", Duration::from_secs(2)).unwrap();
        assert!(!probe.is_running().await);
    }
}
