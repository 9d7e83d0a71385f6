//! Inbound command handling
//!
//! The coordinator drives the agent with small tagged JSON messages over
//! the control channel. Recognized commands produce a JSON reply; anything
//! else is logged and ignored, since not every inbound message is a
//! command.

use crate::error::AgentError;
use cluster_store::ClusterStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Commands the coordinator may send
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Command {
    /// List the pods in a namespace (default namespace when omitted)
    #[serde(rename_all = "camelCase")]
    ListPods { namespace: Option<String> },
    /// Report the cluster's API server version
    ServerVersion,
}

/// One pod row in a `listPods` reply
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PodSummary {
    name: String,
    phase: Option<String>,
}

/// Answers coordinator commands against the cluster state store
pub struct CommandHandler {
    store: Arc<dyn ClusterStore>,
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler").finish_non_exhaustive()
    }
}

impl CommandHandler {
    /// Create a handler over a store
    #[must_use]
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self { store }
    }

    /// Handle one inbound text message.
    ///
    /// # Returns
    /// * `Ok(Some(reply))` - The message was a recognized command
    /// * `Ok(None)` - Not a command; nothing to send back
    /// * `Err(AgentError)` - The command was recognized but failed
    pub async fn handle(&self, text: &str) -> Result<Option<String>, AgentError> {
        debug!("recv: {}", text);

        let Ok(command) = serde_json::from_str::<Command>(text) else {
            return Ok(None);
        };

        match command {
            Command::ListPods { namespace } => {
                let namespace = namespace.unwrap_or_else(|| "default".to_string());
                let pods = self.store.list_pods(&namespace).await?;
                let items: Vec<PodSummary> = pods
                    .into_iter()
                    .map(|pod| PodSummary {
                        name: pod.metadata.name.unwrap_or_default(),
                        phase: pod.status.and_then(|status| status.phase),
                    })
                    .collect();
                let reply = json!({
                    "type": "pods",
                    "namespace": namespace,
                    "items": items,
                });
                Ok(Some(serde_json::to_string(&reply)?))
            }
            Command::ServerVersion => {
                let info = self.store.server_version().await?;
                let reply = json!({
                    "type": "serverVersion",
                    "gitVersion": info.git_version,
                });
                Ok(Some(serde_json::to_string(&reply)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluster_store::MockClusterStore;
    use k8s_openapi::api::core::v1::{Pod, PodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pod(name: &str, phase: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                ..PodStatus::default()
            }),
            ..Pod::default()
        }
    }

    #[tokio::test]
    async fn list_pods_replies_with_names_and_phases() {
        let store = MockClusterStore::new();
        store.add_pods("garage", vec![pod("garage-0", "Running")]);
        let handler = CommandHandler::new(Arc::new(store));

        let reply = handler
            .handle(r#"{"type": "listPods", "namespace": "garage"}"#)
            .await
            .unwrap()
            .unwrap();
        let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["type"], "pods");
        assert_eq!(reply["namespace"], "garage");
        assert_eq!(reply["items"][0]["name"], "garage-0");
        assert_eq!(reply["items"][0]["phase"], "Running");
    }

    #[tokio::test]
    async fn list_pods_defaults_to_the_default_namespace() {
        let store = MockClusterStore::new();
        let handler = CommandHandler::new(Arc::new(store));

        let reply = handler
            .handle(r#"{"type": "listPods"}"#)
            .await
            .unwrap()
            .unwrap();
        let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["namespace"], "default");
        assert!(reply["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_version_replies_with_the_git_version() {
        let store = MockClusterStore::new();
        let handler = CommandHandler::new(Arc::new(store));

        let reply = handler
            .handle(r#"{"type": "serverVersion"}"#)
            .await
            .unwrap()
            .unwrap();
        let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["type"], "serverVersion");
        assert_eq!(reply["gitVersion"], "v1.30.0");
    }

    #[tokio::test]
    async fn unrecognized_messages_are_ignored() {
        let store = MockClusterStore::new();
        let handler = CommandHandler::new(Arc::new(store));

        assert!(handler.handle("hello there").await.unwrap().is_none());
        assert!(handler
            .handle(r#"{"type": "selfDestruct"}"#)
            .await
            .unwrap()
            .is_none());
    }
}
