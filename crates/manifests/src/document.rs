//! Declarative document model
//!
//! A [`Manifest`] is one resource's desired state as untyped JSON: an
//! `apiVersion`/`kind` pair, `metadata.name` (and optionally
//! `metadata.namespace`), and an arbitrary `spec` subtree. Documents stay
//! untyped end to end so custom resources need no bindings.

use crate::error::ReconcileError;
use serde_json::Value;

/// One declarative document
#[derive(Debug, Clone)]
pub struct Manifest {
    value: Value,
}

impl Manifest {
    /// Wrap an already-decoded JSON value
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Whether the document carries no content.
    ///
    /// Empty documents are skipped by the reconciler as a successful no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// The document's `apiVersion` string
    pub fn api_version(&self) -> Result<&str, ReconcileError> {
        self.required_str(&["apiVersion"], "apiVersion")
    }

    /// The document's `kind`
    pub fn kind(&self) -> Result<&str, ReconcileError> {
        self.required_str(&["kind"], "kind")
    }

    /// The document's `metadata.name`
    pub fn name(&self) -> Result<&str, ReconcileError> {
        self.required_str(&["metadata", "name"], "metadata.name")
    }

    /// The document's `metadata.namespace`, if present and non-empty.
    ///
    /// An absent or empty namespace means the resource is cluster-scoped.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.lookup(&["metadata", "namespace"])
            .and_then(Value::as_str)
            .filter(|ns| !ns.is_empty())
    }

    /// Copy a live object's version token into this document so the store
    /// accepts the update under optimistic concurrency
    pub fn set_resource_version(&mut self, resource_version: &str) {
        if let Some(metadata) = self
            .value
            .as_object_mut()
            .map(|map| map.entry("metadata").or_insert_with(|| Value::Object(Default::default())))
            .and_then(Value::as_object_mut)
        {
            metadata.insert(
                "resourceVersion".to_string(),
                Value::String(resource_version.to_string()),
            );
        }
    }

    /// The underlying JSON value
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.value;
        for segment in path {
            current = current.get(segment)?;
        }
        Some(current)
    }

    fn required_str(&self, path: &[&str], field: &str) -> Result<&str, ReconcileError> {
        self.lookup(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ReconcileError::InvalidManifest {
                detail: format!("missing required field {field}"),
            })
    }
}

impl From<Value> for Manifest {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
