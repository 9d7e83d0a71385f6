//! Agent configuration
//!
//! Configuration is read from the environment once at startup and passed
//! to the session as an explicit structure; nothing else in the process
//! reads environment state.

use crate::error::AgentError;
use std::env;

/// Runtime configuration for one agent process
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Coordinator `host:port` to dial
    pub address: String,
    /// Bearer credential shared with the coordinator out of band
    pub auth_token: String,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// `COORDINATOR_ADDR` defaults to `localhost:8080`; `AGENT_TOKEN` is
    /// required and startup fails without it.
    pub fn from_env() -> Result<Self, AgentError> {
        let address =
            env::var("COORDINATOR_ADDR").unwrap_or_else(|_| "localhost:8080".to_string());
        let auth_token = env::var("AGENT_TOKEN").map_err(|_| {
            AgentError::InvalidConfig("AGENT_TOKEN environment variable is required".to_string())
        })?;
        Ok(Self {
            address,
            auth_token,
        })
    }

    /// URL of the coordinator's cluster-config endpoint
    pub fn config_url(&self) -> String {
        format!("https://{}/api/agents/cluster-config", self.address)
    }

    /// URL of the coordinator's agent WebSocket endpoint
    pub fn channel_url(&self) -> String {
        format!("ws://{}/api/agents/ws", self.address)
    }

    /// The `Authorization` header value for coordinator requests
    pub fn authorization(&self) -> String {
        format!("Bot {}", self.auth_token)
    }
}
