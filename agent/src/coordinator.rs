//! Coordinator HTTP client
//!
//! Fetches the cluster's bootstrap configuration from the coordinator's
//! agent API. The response decides which add-ons this agent reconciles,
//! so an unreachable coordinator or a malformed response fails startup.

use crate::config::AgentConfig;
use crate::error::AgentError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Bootstrap configuration served by the coordinator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Deploy the S3-compatible object store add-on
    pub enable_s3_service: bool,
    /// Deploy the managed database add-on
    pub enable_db_service: bool,
    /// Cluster name registered with the coordinator
    pub name: String,
}

/// HTTP client for the coordinator's agent API
pub struct CoordinatorClient {
    client: reqwest::Client,
    config_url: String,
    authorization: String,
}

impl std::fmt::Debug for CoordinatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The authorization header stays out of logs
        f.debug_struct("CoordinatorClient")
            .field("config_url", &self.config_url)
            .finish_non_exhaustive()
    }
}

impl CoordinatorClient {
    /// Create a client for the configured coordinator
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            config_url: config.config_url(),
            authorization: config.authorization(),
        })
    }

    /// Fetch the cluster's bootstrap configuration.
    ///
    /// # Returns
    /// * `Ok(ClusterConfig)` - The coordinator's add-on toggles for this cluster
    /// * `Err(AgentError)` - Request failed, non-success status, or malformed body
    pub async fn cluster_config(&self) -> Result<ClusterConfig, AgentError> {
        debug!("Fetching cluster configuration from {}", self.config_url);

        let response = self
            .client
            .get(&self.config_url)
            .header("Content-Type", "application/json")
            .header("Authorization", self.authorization.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Coordinator(format!(
                "cluster-config request failed: {status} - {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            AgentError::Coordinator(format!(
                "error decoding cluster-config response: {e} - Response (first 500 chars): {}",
                body.chars().take(500).collect::<String>()
            ))
        })
    }
}
