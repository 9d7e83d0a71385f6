//! Cluster state store errors

use thiserror::Error;

/// Errors that can occur when interacting with the cluster state store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Kubernetes API transport or protocol error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// The store rejected the request with a non-success status
    #[error("store API error: {0}")]
    Api(String),

    /// Object not found at the requested coordinate.
    /// During reconciliation this is a signal to create, not a failure.
    #[error("not found: {0}")]
    NotFound(String),

    /// Optimistic-concurrency rejection: the submitted resource version
    /// no longer matches the stored object
    #[error("version conflict: {0}")]
    Conflict(String),

    /// Authentication or authorization failure
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
