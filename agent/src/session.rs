//! Agent session lifecycle
//!
//! Owns the process-wide sequence: validate cluster connectivity, fetch
//! the coordinator's bootstrap configuration, open the control channel,
//! reconcile the enabled add-ons, then run the heartbeat/command loop
//! until a shutdown signal triggers a graceful channel close.

use crate::channel::ControlChannel;
use crate::config::AgentConfig;
use crate::coordinator::CoordinatorClient;
use crate::error::AgentError;
use crate::handler::CommandHandler;
use chrono::Utc;
use cluster_store::ClusterStore;
use manifests::{BootstrapPlanner, BootstrapToggles, Reconciler};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

/// Heartbeat cadence on the control channel
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Process-wide agent lifecycle
pub struct Session {
    config: AgentConfig,
    store: Arc<dyn ClusterStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.config.address)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session from explicit configuration and a store
    #[must_use]
    pub fn new(config: AgentConfig, store: Arc<dyn ClusterStore>) -> Self {
        Self { config, store }
    }

    /// Run the session to completion.
    ///
    /// Startup is strict: connectivity probe, configuration fetch, channel
    /// connect and add-on bootstrap must all succeed before the loop
    /// starts. A bootstrap failure leaves the process exit to the
    /// operator — partial add-on state is not retried silently.
    pub async fn run(self) -> Result<(), AgentError> {
        let version = self.store.server_version().await?;
        info!("Connected to Kubernetes API server {}", version.git_version);

        let coordinator = CoordinatorClient::new(&self.config)?;
        let cluster_config = coordinator.cluster_config().await?;
        info!(
            "Cluster {:?}: object store enabled={}, database enabled={}",
            cluster_config.name, cluster_config.enable_s3_service, cluster_config.enable_db_service
        );

        let mut channel = ControlChannel::connect(&self.config).await?;

        let reconciler = Reconciler::new(Arc::clone(&self.store));
        let planner = BootstrapPlanner::new(&reconciler);
        let toggles = BootstrapToggles {
            object_store: cluster_config.enable_s3_service,
            database: cluster_config.enable_db_service,
        };
        planner.bootstrap(&toggles).await?;
        info!("Cluster bootstrap complete");

        let handler = CommandHandler::new(Arc::clone(&self.store));
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    channel.send_text(Utc::now().to_rfc3339()).await?;
                }
                inbound = channel.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match handler.handle(text.as_str()).await {
                            Ok(Some(reply)) => channel.send_text(reply).await?,
                            Ok(None) => {}
                            // A failed command is reported and the loop
                            // keeps running; only channel failures end it
                            Err(err) => warn!("Command failed: {}", err),
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Coordinator closed the channel");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        error!("read: {}", err);
                        return Err(err);
                    }
                    None => {
                        info!("Control channel ended");
                        return Ok(());
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    channel.close().await;
                    return Ok(());
                }
            }
        }
    }
}
