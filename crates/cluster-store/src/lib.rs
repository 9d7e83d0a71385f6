//! Kubernetes State Store Client
//!
//! A client library for the cluster state store consumed by the agent's
//! reconciliation engine. Objects are addressed by [`ResourceCoordinate`]
//! (group, version, plural resource, namespace, name) and manipulated as
//! untyped JSON manifests, so the same code path serves built-in kinds and
//! custom resources alike.
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{ClusterStore, KubeClusterStore, ResourceCoordinate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connects in-cluster, or via the local kubeconfig outside a cluster
//! let store = KubeClusterStore::try_default().await?;
//!
//! let coord = ResourceCoordinate {
//!     group: "helm.cattle.io".to_string(),
//!     version: "v1".to_string(),
//!     kind: "HelmChart".to_string(),
//!     resource: "helmcharts".to_string(),
//!     namespace: Some("kube-system".to_string()),
//!     name: "garage".to_string(),
//! };
//!
//! let existing = store.get(&coord).await?;
//! println!("live resourceVersion: {:?}", existing.resource_version);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeClusterStore;
pub use error::StoreError;
pub use models::{ExistingObject, ResourceCoordinate};
pub use store_trait::ClusterStore;
#[cfg(feature = "test-util")]
pub use mock::{MockClusterStore, StoreOp};
