//! Store addressing and object models

use serde_json::Value;
use std::fmt;

/// The address of one object in the cluster state store.
///
/// Carries the API group/version, the kind and its plural REST resource
/// name, and the namespace/name pair. An absent namespace means the
/// resource is cluster-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCoordinate {
    /// API group, empty for the core group
    pub group: String,
    /// API version within the group (e.g. "v1", "v1alpha1")
    pub version: String,
    /// Kind as it appears in the manifest (e.g. "HelmChart")
    pub kind: String,
    /// Plural REST resource name (e.g. "helmcharts")
    pub resource: String,
    /// Namespace, or `None` for cluster-scoped resources
    pub namespace: Option<String>,
    /// Object name
    pub name: String,
}

impl ResourceCoordinate {
    /// The `apiVersion` string for this coordinate ("group/version", or
    /// just "version" for the core group).
    #[must_use]
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Whether the coordinate addresses a namespaced resource.
    #[must_use]
    pub fn is_namespaced(&self) -> bool {
        self.namespace.is_some()
    }
}

impl fmt::Display for ResourceCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// The store's current representation of an object at a coordinate.
///
/// `resource_version` is the opaque optimistic-concurrency token. It must
/// be copied into an outgoing manifest for an update to be accepted, and it
/// goes stale the moment another writer touches the same coordinate, so
/// handles are fetched fresh before every update decision and never cached.
#[derive(Debug, Clone)]
pub struct ExistingObject {
    /// Opaque version token of the live object
    pub resource_version: Option<String>,
    /// The live object as untyped JSON
    pub manifest: Value,
}
