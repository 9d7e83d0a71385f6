//! Declarative Manifest Reconciliation
//!
//! The agent's reconciliation core: decodes multi-document YAML blobs into
//! declarative documents, resolves each document to a cluster API
//! coordinate, and drives an idempotent create-or-update against the
//! cluster state store, carrying the live resource version forward so a
//! racing writer produces an explicit conflict instead of a lost update.
//!
//! The [`bootstrap`] module builds the fixed add-on documents (object
//! store, managed database) from the coordinator's feature toggles and
//! runs them through the [`Reconciler`].

pub mod bootstrap;
pub mod decode;
pub mod document;
pub mod error;
pub mod reconciler;
pub mod resolver;

#[cfg(test)]
mod decode_test;
#[cfg(test)]
mod reconciler_test;

pub use bootstrap::{BootstrapPlanner, BootstrapToggles};
pub use decode::{decode_documents, DocumentStream};
pub use document::Manifest;
pub use error::ReconcileError;
pub use reconciler::{Applied, Reconciler};
pub use resolver::{plural_resource, resolve};
