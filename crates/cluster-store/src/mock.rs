//! Mock ClusterStore for unit testing
//!
//! This module provides a mock implementation of [`ClusterStore`] that can
//! be used in unit tests without requiring a running cluster.
//!
//! The mock stores objects in memory keyed by coordinate, maintains a
//! monotonically increasing resource-version counter, and records every
//! call in an operation log so tests can assert exactly which store calls
//! a reconciliation pass performed. Updates enforce the same
//! optimistic-concurrency contract as the real API server: a missing
//! version token is rejected outright and a stale one is a conflict.

use crate::error::StoreError;
use crate::models::{ExistingObject, ResourceCoordinate};
use crate::store_trait::ClusterStore;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::version::Info;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One recorded store call, for call-count assertions in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// `get` against the keyed coordinate
    Get(String),
    /// `create` against the keyed coordinate
    Create(String),
    /// `update` against the keyed coordinate
    Update(String),
    /// `server_version` probe
    ServerVersion,
    /// `list_pods` for the named namespace
    ListPods(String),
}

#[derive(Debug, Clone)]
struct StoredObject {
    resource_version: u64,
    manifest: Value,
}

/// Mock ClusterStore for testing
///
/// Objects live in an in-memory map and can be seeded with
/// [`add_object`](MockClusterStore::add_object). Failures can be injected
/// per object name to exercise the reconciler's error paths.
#[derive(Clone)]
pub struct MockClusterStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    pods: Arc<Mutex<HashMap<String, Vec<Pod>>>>,
    ops: Arc<Mutex<Vec<StoreOp>>>,
    fail_get: Arc<Mutex<HashSet<String>>>,
    fail_create: Arc<Mutex<HashSet<String>>>,
    fail_update: Arc<Mutex<HashSet<String>>>,
    conflict_update: Arc<Mutex<HashSet<String>>>,
    next_version: Arc<Mutex<u64>>,
    version: Arc<Mutex<Info>>,
}

impl std::fmt::Debug for MockClusterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClusterStore").finish_non_exhaustive()
    }
}

impl Default for MockClusterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClusterStore {
    /// Create an empty mock store
    #[must_use]
    pub fn new() -> Self {
        let version = Info {
            major: "1".to_string(),
            minor: "30".to_string(),
            git_version: "v1.30.0".to_string(),
            ..Info::default()
        };
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            pods: Arc::new(Mutex::new(HashMap::new())),
            ops: Arc::new(Mutex::new(Vec::new())),
            fail_get: Arc::new(Mutex::new(HashSet::new())),
            fail_create: Arc::new(Mutex::new(HashSet::new())),
            fail_update: Arc::new(Mutex::new(HashSet::new())),
            conflict_update: Arc::new(Mutex::new(HashSet::new())),
            next_version: Arc::new(Mutex::new(1)),
            version: Arc::new(Mutex::new(version)),
        }
    }

    /// Seed an object at a coordinate (for test setup).
    ///
    /// Assigns the next resource version, exactly as a create would.
    pub fn add_object(&self, coord: &ResourceCoordinate, manifest: Value) {
        let rv = self.bump_version();
        self.objects.lock().unwrap().insert(
            key(coord),
            StoredObject {
                resource_version: rv,
                manifest,
            },
        );
    }

    /// Seed pods for a namespace (for test setup)
    pub fn add_pods(&self, namespace: &str, pods: Vec<Pod>) {
        self.pods
            .lock()
            .unwrap()
            .entry(namespace.to_string())
            .or_default()
            .extend(pods);
    }

    /// Override the reported API server version (for test setup)
    pub fn set_server_version(&self, info: Info) {
        *self.version.lock().unwrap() = info;
    }

    /// Make `get` fail for any coordinate with the given object name
    pub fn fail_get_for(&self, name: &str) {
        self.fail_get.lock().unwrap().insert(name.to_string());
    }

    /// Make `create` fail for any coordinate with the given object name
    pub fn fail_create_for(&self, name: &str) {
        self.fail_create.lock().unwrap().insert(name.to_string());
    }

    /// Make `update` fail for any coordinate with the given object name
    pub fn fail_update_for(&self, name: &str) {
        self.fail_update.lock().unwrap().insert(name.to_string());
    }

    /// Make `update` report a version conflict for the given object name,
    /// as if a concurrent writer had bumped the version between the
    /// caller's fetch and its update
    pub fn conflict_on_update_for(&self, name: &str) {
        self.conflict_update.lock().unwrap().insert(name.to_string());
    }

    /// Every store call recorded so far, in order
    #[must_use]
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    /// The stored manifest at a coordinate, if any
    #[must_use]
    pub fn object(&self, coord: &ResourceCoordinate) -> Option<Value> {
        self.objects
            .lock()
            .unwrap()
            .get(&key(coord))
            .map(|o| o.manifest.clone())
    }

    /// The current resource version at a coordinate, if any
    #[must_use]
    pub fn resource_version(&self, coord: &ResourceCoordinate) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&key(coord))
            .map(|o| o.resource_version.to_string())
    }

    fn bump_version(&self) -> u64 {
        let mut next = self.next_version.lock().unwrap();
        let rv = *next;
        *next += 1;
        rv
    }

    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

/// Stable map key for a coordinate
fn key(coord: &ResourceCoordinate) -> String {
    let group_resource = if coord.group.is_empty() {
        coord.resource.clone()
    } else {
        format!("{}.{}", coord.resource, coord.group)
    };
    format!(
        "{}/{}/{}",
        group_resource,
        coord.namespace.as_deref().unwrap_or(""),
        coord.name
    )
}

/// The version token a manifest carries, if any
fn manifest_version(manifest: &Value) -> Option<&str> {
    manifest
        .get("metadata")
        .and_then(|m| m.get("resourceVersion"))
        .and_then(Value::as_str)
}

#[async_trait::async_trait]
impl ClusterStore for MockClusterStore {
    async fn get(&self, coord: &ResourceCoordinate) -> Result<ExistingObject, StoreError> {
        self.record(StoreOp::Get(key(coord)));
        if self.fail_get.lock().unwrap().contains(&coord.name) {
            return Err(StoreError::Api(format!(
                "injected get failure for {}",
                coord.name
            )));
        }
        let objects = self.objects.lock().unwrap();
        let stored = objects
            .get(&key(coord))
            .ok_or_else(|| StoreError::NotFound(coord.to_string()))?;

        // Live objects carry their version token in metadata, like the
        // real API server's representation
        let mut manifest = stored.manifest.clone();
        if let Some(meta) = manifest.get_mut("metadata").and_then(Value::as_object_mut) {
            meta.insert(
                "resourceVersion".to_string(),
                Value::String(stored.resource_version.to_string()),
            );
        }
        Ok(ExistingObject {
            resource_version: Some(stored.resource_version.to_string()),
            manifest,
        })
    }

    async fn create(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError> {
        self.record(StoreOp::Create(key(coord)));
        if self.fail_create.lock().unwrap().contains(&coord.name) {
            return Err(StoreError::Api(format!(
                "injected create failure for {}",
                coord.name
            )));
        }
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(&key(coord)) {
            return Err(StoreError::Conflict(format!("{coord} already exists")));
        }
        let rv = self.bump_version();
        objects.insert(
            key(coord),
            StoredObject {
                resource_version: rv,
                manifest: manifest.clone(),
            },
        );
        Ok(())
    }

    async fn update(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError> {
        self.record(StoreOp::Update(key(coord)));
        if self.fail_update.lock().unwrap().contains(&coord.name) {
            return Err(StoreError::Api(format!(
                "injected update failure for {}",
                coord.name
            )));
        }
        if self.conflict_update.lock().unwrap().contains(&coord.name) {
            return Err(StoreError::Conflict(format!(
                "{coord}: the object has been modified; please apply your changes to the latest version"
            )));
        }
        let mut objects = self.objects.lock().unwrap();
        let stored = objects
            .get(&key(coord))
            .ok_or_else(|| StoreError::NotFound(coord.to_string()))?;

        let submitted = manifest_version(manifest).ok_or_else(|| {
            StoreError::Api(format!(
                "resourceVersion must be specified for an update of {coord}"
            ))
        })?;
        if submitted != stored.resource_version.to_string() {
            return Err(StoreError::Conflict(format!(
                "{coord}: resourceVersion {submitted} is stale (current {})",
                stored.resource_version
            )));
        }
        let rv = self.bump_version();
        objects.insert(
            key(coord),
            StoredObject {
                resource_version: rv,
                manifest: manifest.clone(),
            },
        );
        Ok(())
    }

    async fn server_version(&self) -> Result<Info, StoreError> {
        self.record(StoreOp::ServerVersion);
        Ok(self.version.lock().unwrap().clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, StoreError> {
        self.record(StoreOp::ListPods(namespace.to_string()));
        Ok(self
            .pods
            .lock()
            .unwrap()
            .get(namespace)
            .cloned()
            .unwrap_or_default())
    }
}
