//! Create-or-update reconciliation
//!
//! Applies declarative documents against the cluster state store one at a
//! time: fetch the existing object, create it if absent, otherwise carry
//! the live resource version into the outgoing document and replace it.
//! The version carry-forward is the sole concurrency guard — the
//! get-then-write sequence is not transactional, and a racing writer
//! surfaces as an explicit conflict error rather than a silent lost
//! update.

use crate::decode::decode_documents;
use crate::document::Manifest;
use crate::error::ReconcileError;
use crate::resolver;
use cluster_store::{ClusterStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of applying one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The document was empty; nothing was sent to the store
    Skipped,
    /// No object existed at the coordinate; one was created
    Created,
    /// An object existed; it was replaced under its current version token
    Updated,
}

/// Applies declarative documents to a cluster state store
pub struct Reconciler {
    store: Arc<dyn ClusterStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler over a store
    #[must_use]
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self { store }
    }

    /// Apply one document: create it if absent, update it if present.
    ///
    /// The existing object is fetched fresh on every call — its version
    /// token is never cached across calls, since it goes stale the moment
    /// another writer touches the coordinate.
    pub async fn apply(&self, mut manifest: Manifest) -> Result<Applied, ReconcileError> {
        if manifest.is_empty() {
            debug!("Skipping empty document");
            return Ok(Applied::Skipped);
        }
        let coord = resolver::resolve(&manifest)?;

        match self.store.get(&coord).await {
            Ok(existing) => {
                if let Some(version) = existing.resource_version.as_deref() {
                    manifest.set_resource_version(version);
                }
                self.store
                    .update(&coord, manifest.value())
                    .await
                    .map_err(|source| match source {
                        StoreError::Conflict(_) => ReconcileError::Conflict {
                            kind: coord.kind.clone(),
                            name: coord.name.clone(),
                            source,
                        },
                        _ => ReconcileError::Update {
                            kind: coord.kind.clone(),
                            name: coord.name.clone(),
                            source,
                        },
                    })?;
                info!("Updated {}", coord);
                Ok(Applied::Updated)
            }
            Err(StoreError::NotFound(_)) => {
                self.store
                    .create(&coord, manifest.value())
                    .await
                    .map_err(|source| ReconcileError::Create {
                        kind: coord.kind.clone(),
                        name: coord.name.clone(),
                        source,
                    })?;
                info!("Created {}", coord);
                Ok(Applied::Created)
            }
            Err(source) => Err(ReconcileError::Fetch {
                kind: coord.kind.clone(),
                name: coord.name.clone(),
                source,
            }),
        }
    }

    /// Apply a sequence of documents in order, stopping at the first
    /// failure.
    ///
    /// Documents applied before the failure stay applied; nothing after it
    /// is attempted. Sequential application keeps failure attribution
    /// unambiguous.
    pub async fn apply_all<I>(&self, documents: I) -> Result<(), ReconcileError>
    where
        I: IntoIterator<Item = Result<Manifest, ReconcileError>>,
    {
        for document in documents {
            self.apply(document?).await?;
        }
        Ok(())
    }

    /// Decode a text blob and apply every document in it
    pub async fn apply_text(&self, text: &str) -> Result<(), ReconcileError> {
        self.apply_all(decode_documents(text)).await
    }
}
