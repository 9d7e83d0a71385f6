//! ClusterStore trait for mocking
//!
//! This trait abstracts the cluster state store to enable mocking in unit
//! tests. The concrete [`KubeClusterStore`](crate::KubeClusterStore)
//! implements this trait, and tests can use mock implementations.

use crate::error::StoreError;
use crate::models::{ExistingObject, ResourceCoordinate};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::version::Info;
use serde_json::Value;

/// Trait for cluster state store operations
///
/// This trait enables mocking of cluster API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetch the current object at a coordinate.
    ///
    /// Returns [`StoreError::NotFound`] when nothing lives there, which
    /// callers treat as a signal to create rather than a failure.
    async fn get(&self, coord: &ResourceCoordinate) -> Result<ExistingObject, StoreError>;

    /// Create a new object at a coordinate from an untyped manifest.
    async fn create(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError>;

    /// Replace the object at a coordinate with an untyped manifest.
    ///
    /// The manifest must carry the live object's current
    /// `metadata.resourceVersion`; the store rejects a stale or missing
    /// token rather than silently overwriting a concurrent write.
    async fn update(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError>;

    /// Fetch the API server's version info.
    ///
    /// Doubles as a connectivity probe at agent startup.
    async fn server_version(&self) -> Result<Info, StoreError>;

    /// List the pods in a namespace.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, StoreError>;
}
