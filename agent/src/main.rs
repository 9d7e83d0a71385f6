//! Cluster Agent
//!
//! Cluster-side agent for the coordinator-managed fleet:
//! - Bootstraps cluster add-ons (object store, managed database) from the
//!   coordinator's feature toggles, via declarative manifest reconciliation
//! - Maintains a WebSocket control channel to the coordinator, sending
//!   heartbeats and answering inventory commands
//!
//! A failed bootstrap aborts startup: partial add-on state is an
//! operator-visible condition, not something to retry silently.

mod channel;
mod config;
mod coordinator;
mod error;
mod handler;
mod session;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::session::Session;
use cluster_store::KubeClusterStore;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    tracing_subscriber::fmt::init();

    info!("Starting cluster agent");

    let config = AgentConfig::from_env()?;
    info!("Configuration:");
    info!("  Coordinator address: {}", config.address);

    // In-cluster service account when deployed, local kubeconfig otherwise
    let store = KubeClusterStore::try_default().await?;

    let session = Session::new(config, Arc::new(store));
    session.run().await
}
