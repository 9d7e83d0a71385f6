//! Tests for the mock store's optimistic-concurrency contract
//!
//! The reconciler tests in the manifests crate lean on this behavior, so
//! the contract is pinned down here: version tokens are assigned on create,
//! bumped on every accepted update, and updates without a fresh token are
//! rejected the way the real API server rejects them.

use cluster_store::{ClusterStore, MockClusterStore, ResourceCoordinate, StoreError, StoreOp};
use serde_json::json;

fn chart_coord(name: &str) -> ResourceCoordinate {
    ResourceCoordinate {
        group: "helm.cattle.io".to_string(),
        version: "v1".to_string(),
        kind: "HelmChart".to_string(),
        resource: "helmcharts".to_string(),
        namespace: Some("kube-system".to_string()),
        name: name.to_string(),
    }
}

fn chart_manifest(name: &str) -> serde_json::Value {
    json!({
        "apiVersion": "helm.cattle.io/v1",
        "kind": "HelmChart",
        "metadata": {"name": name, "namespace": "kube-system"},
        "spec": {"chart": name}
    })
}

#[tokio::test]
async fn get_missing_object_is_not_found() {
    let store = MockClusterStore::new();
    let err = store.get(&chart_coord("garage")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn create_assigns_a_version_token() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    let existing = store.get(&coord).await.unwrap();
    assert_eq!(existing.resource_version.as_deref(), Some("1"));
    // The live manifest carries the token in metadata too
    assert_eq!(
        existing.manifest["metadata"]["resourceVersion"],
        json!("1")
    );
}

#[tokio::test]
async fn create_of_existing_object_conflicts() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    let err = store
        .create(&coord, &chart_manifest("garage"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn update_with_current_token_bumps_the_version() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    let mut manifest = chart_manifest("garage");
    manifest["metadata"]["resourceVersion"] = json!("1");
    store.update(&coord, &manifest).await.unwrap();

    assert_eq!(store.resource_version(&coord).as_deref(), Some("2"));
}

#[tokio::test]
async fn update_with_stale_token_is_rejected() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    // First writer wins and bumps the version
    let mut fresh = chart_manifest("garage");
    fresh["metadata"]["resourceVersion"] = json!("1");
    store.update(&coord, &fresh).await.unwrap();

    // Second writer still holds token "1"
    let err = store.update(&coord, &fresh).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn update_without_token_is_rejected() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    let err = store
        .update(&coord, &chart_manifest("garage"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Api(_)));
}

#[tokio::test]
async fn operation_log_records_calls_in_order() {
    let store = MockClusterStore::new();
    let coord = chart_coord("garage");

    let _ = store.get(&coord).await;
    store.create(&coord, &chart_manifest("garage")).await.unwrap();

    let ops = store.ops();
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[0], StoreOp::Get(_)));
    assert!(matches!(ops[1], StoreOp::Create(_)));
}
