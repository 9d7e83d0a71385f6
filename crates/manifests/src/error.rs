//! Reconciliation error types
//!
//! Every variant names the offending document so a failed bootstrap can be
//! traced to a single manifest. Not-found is deliberately absent: during
//! reconciliation it is a signal to create, not a failure.

use cluster_store::StoreError;
use thiserror::Error;

/// Errors that can occur while decoding or reconciling manifests.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A document in the blob failed to parse. Documents decoded before
    /// this one remain valid; the rest of the blob is abandoned.
    #[error("failed to decode manifest document {index}: {source}")]
    Decode {
        /// 1-based position of the document within the blob
        index: usize,
        /// Underlying parser diagnostics (includes line/column)
        source: serde_yaml::Error,
    },

    /// A document parsed but is missing a field reconciliation requires
    #[error("invalid manifest: {detail}")]
    InvalidManifest {
        /// What was missing or malformed
        detail: String,
    },

    /// Fetching the existing object failed with something other than
    /// not-found
    #[error("failed to fetch {kind} {name}: {source}")]
    Fetch {
        /// Kind of the offending document
        kind: String,
        /// Name of the offending document
        name: String,
        /// Underlying store failure
        source: StoreError,
    },

    /// Creating the object failed
    #[error("failed to create {kind} {name}: {source}")]
    Create {
        /// Kind of the offending document
        kind: String,
        /// Name of the offending document
        name: String,
        /// Underlying store failure
        source: StoreError,
    },

    /// Updating the object failed
    #[error("failed to update {kind} {name}: {source}")]
    Update {
        /// Kind of the offending document
        kind: String,
        /// Name of the offending document
        name: String,
        /// Underlying store failure
        source: StoreError,
    },

    /// A concurrent writer changed the object between our fetch and our
    /// update; the carried resource version no longer matched
    #[error("conflicting write detected on {kind} {name}: {source}")]
    Conflict {
        /// Kind of the offending document
        kind: String,
        /// Name of the offending document
        name: String,
        /// The store's rejection
        source: StoreError,
    },
}
