//! Agent-specific error types
//!
//! This module defines error types specific to the agent binary that are
//! not covered by the library crates' errors.

use manifests::ReconcileError;
use thiserror::Error;

/// Errors that can occur while running the agent
#[derive(Debug, Error)]
pub enum AgentError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cluster state store error
    #[error("Cluster store error: {0}")]
    Store(#[from] cluster_store::StoreError),

    /// Add-on reconciliation failed
    #[error("Reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Coordinator HTTP request failed
    #[error("Coordinator request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Coordinator returned an unusable response
    #[error("Invalid coordinator response: {0}")]
    Coordinator(String),

    /// Control channel failure
    #[error("Control channel error: {0}")]
    Channel(#[from] tokio_tungstenite::tungstenite::Error),

    /// Message serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
