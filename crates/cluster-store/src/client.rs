//! Kubernetes-backed cluster state store
//!
//! Implements [`ClusterStore`] on top of the kube dynamic API. Objects are
//! addressed by [`ResourceCoordinate`] and exchanged as untyped JSON, so no
//! typed bindings are needed for the custom resources the agent applies.

use crate::error::StoreError;
use crate::models::{ExistingObject, ResourceCoordinate};
use crate::store_trait::ClusterStore;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{Api, ListParams, PostParams};
use kube::core::{ApiResource, DynamicObject};
use kube::Client;
use serde_json::Value;
use tracing::debug;

/// Cluster state store backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeClusterStore {
    client: Client,
}

impl std::fmt::Debug for KubeClusterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterStore").finish_non_exhaustive()
    }
}

impl KubeClusterStore {
    /// Create a store from an existing Kubernetes client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a store using the default client inference.
    ///
    /// Uses the in-cluster service account when running inside a cluster,
    /// otherwise falls back to the local kubeconfig.
    pub async fn try_default() -> Result<Self, StoreError> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    /// Build a dynamic API handle for a coordinate.
    ///
    /// Namespaced coordinates address `/namespaces/{ns}/{resource}`,
    /// cluster-scoped coordinates address the resource collection directly.
    fn dynamic_api(&self, coord: &ResourceCoordinate) -> Api<DynamicObject> {
        let resource = ApiResource {
            group: coord.group.clone(),
            version: coord.version.clone(),
            api_version: coord.api_version(),
            kind: coord.kind.clone(),
            plural: coord.resource.clone(),
        };
        match coord.namespace.as_deref() {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        }
    }

    /// Fetch the current object at a coordinate
    ///
    /// # Returns
    /// * `Ok(ExistingObject)` - The live object and its version token
    /// * `Err(StoreError::NotFound)` - Nothing exists at the coordinate
    /// * `Err(StoreError)` - Any other API failure
    pub async fn get(&self, coord: &ResourceCoordinate) -> Result<ExistingObject, StoreError> {
        debug!("Fetching {}", coord);
        let api = self.dynamic_api(coord);
        let object = api.get(&coord.name).await.map_err(map_kube_error)?;

        Ok(ExistingObject {
            resource_version: object.metadata.resource_version.clone(),
            manifest: serde_json::to_value(&object)?,
        })
    }

    /// Create a new object at a coordinate
    pub async fn create(
        &self,
        coord: &ResourceCoordinate,
        manifest: &Value,
    ) -> Result<(), StoreError> {
        debug!("Creating {}", coord);
        let api = self.dynamic_api(coord);
        let object: DynamicObject = serde_json::from_value(manifest.clone())?;
        api.create(&PostParams::default(), &object)
            .await
            .map_err(map_kube_error)?;
        Ok(())
    }

    /// Replace the object at a coordinate.
    ///
    /// Issues a full replace (PUT), so the API server enforces the
    /// optimistic-concurrency check against `metadata.resourceVersion` and
    /// a stale token surfaces as [`StoreError::Conflict`].
    pub async fn update(
        &self,
        coord: &ResourceCoordinate,
        manifest: &Value,
    ) -> Result<(), StoreError> {
        debug!("Updating {}", coord);
        let api = self.dynamic_api(coord);
        let object: DynamicObject = serde_json::from_value(manifest.clone())?;
        api.replace(&coord.name, &PostParams::default(), &object)
            .await
            .map_err(map_kube_error)?;
        Ok(())
    }

    /// Fetch the API server's version info.
    ///
    /// Used as a lightweight connectivity probe before the agent starts
    /// reconciling.
    pub async fn server_version(&self) -> Result<Info, StoreError> {
        debug!("Fetching API server version");
        self.client
            .apiserver_version()
            .await
            .map_err(map_kube_error)
    }

    /// List the pods in a namespace
    pub async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, StoreError> {
        debug!("Listing pods in namespace {}", namespace);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api
            .list(&ListParams::default())
            .await
            .map_err(map_kube_error)?;
        Ok(pods.items)
    }
}

/// Map kube errors onto store error variants.
///
/// Not-found and conflict must stay distinguishable: the reconciler treats
/// 404 as a create signal and 409 as an optimistic-concurrency rejection.
fn map_kube_error(err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(resp.message),
        kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(resp.message),
        kube::Error::Api(resp) if resp.code == 401 || resp.code == 403 => {
            StoreError::Forbidden(resp.message)
        }
        other => StoreError::Kube(other),
    }
}

// Implement ClusterStore for KubeClusterStore
// This delegates all trait methods to the existing implementations
#[async_trait::async_trait]
impl ClusterStore for KubeClusterStore {
    async fn get(&self, coord: &ResourceCoordinate) -> Result<ExistingObject, StoreError> {
        self.get(coord).await
    }

    async fn create(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError> {
        self.create(coord, manifest).await
    }

    async fn update(&self, coord: &ResourceCoordinate, manifest: &Value) -> Result<(), StoreError> {
        self.update(coord, manifest).await
    }

    async fn server_version(&self) -> Result<Info, StoreError> {
        self.server_version().await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, StoreError> {
        self.list_pods(namespace).await
    }
}
