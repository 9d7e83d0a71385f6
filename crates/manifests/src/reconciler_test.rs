//! Unit tests for the reconciler, against the mock cluster store

#[cfg(test)]
mod tests {
    use crate::document::Manifest;
    use crate::error::ReconcileError;
    use crate::reconciler::{Applied, Reconciler};
    use crate::resolver::resolve;
    use cluster_store::{MockClusterStore, ResourceCoordinate, StoreOp};
    use serde_json::json;
    use std::sync::Arc;

    fn reconciler(store: &MockClusterStore) -> Reconciler {
        Reconciler::new(Arc::new(store.clone()))
    }

    fn chart(name: &str, version: &str) -> Manifest {
        Manifest::from_value(json!({
            "apiVersion": "helm.cattle.io/v1",
            "kind": "HelmChart",
            "metadata": {"name": name, "namespace": "kube-system"},
            "spec": {"chart": name, "version": version}
        }))
    }

    fn chart_coord(name: &str) -> ResourceCoordinate {
        resolve(&chart(name, "any")).unwrap()
    }

    #[tokio::test]
    async fn applying_twice_creates_then_updates() {
        let store = MockClusterStore::new();
        let reconciler = reconciler(&store);

        let first = reconciler.apply(chart("garage", "1.0.0")).await.unwrap();
        assert_eq!(first, Applied::Created);

        let second = reconciler.apply(chart("garage", "1.1.0")).await.unwrap();
        assert_eq!(second, Applied::Updated);

        // The stored state matches the second document's desired state,
        // modulo the version token the update carried
        let stored = store.object(&chart_coord("garage")).unwrap();
        assert_eq!(stored["spec"]["version"], json!("1.1.0"));
    }

    #[tokio::test]
    async fn empty_document_is_skipped_without_store_calls() {
        let store = MockClusterStore::new();
        let reconciler = reconciler(&store);

        let outcome = reconciler
            .apply(Manifest::from_value(json!({})))
            .await
            .unwrap();
        assert_eq!(outcome, Applied::Skipped);
        assert!(store.ops().is_empty());
    }

    #[tokio::test]
    async fn apply_all_stops_at_the_first_failing_document() {
        let store = MockClusterStore::new();
        store.fail_create_for("second");
        let reconciler = reconciler(&store);

        let documents = vec![
            Ok(chart("first", "1.0.0")),
            Ok(chart("second", "1.0.0")),
            Ok(chart("third", "1.0.0")),
        ];
        let err = reconciler.apply_all(documents).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Create { ref name, .. } if name == "second"));

        // The first document's write stands and the third was never
        // attempted
        assert!(store.object(&chart_coord("first")).is_some());
        assert!(store.object(&chart_coord("third")).is_none());
        let touched: Vec<_> = store
            .ops()
            .iter()
            .filter(|op| matches!(op, StoreOp::Get(key) | StoreOp::Create(key) | StoreOp::Update(key) if key.contains("third")))
            .cloned()
            .collect();
        assert!(touched.is_empty());
    }

    #[tokio::test]
    async fn update_carries_the_live_resource_version() {
        let store = MockClusterStore::new();
        let coord = chart_coord("garage");
        store.add_object(&coord, chart("garage", "1.0.0").value().clone());

        let reconciler = reconciler(&store);
        let outcome = reconciler.apply(chart("garage", "1.1.0")).await.unwrap();
        assert_eq!(outcome, Applied::Updated);

        // The mock rejects updates whose token does not match, so an
        // accepted update proves the carry-forward; the stored manifest
        // still shows the token that was submitted
        let stored = store.object(&coord).unwrap();
        assert_eq!(stored["metadata"]["resourceVersion"], json!("1"));
        assert_eq!(store.resource_version(&coord).as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn racing_writer_surfaces_as_a_conflict() {
        let store = MockClusterStore::new();
        let coord = chart_coord("garage");
        store.add_object(&coord, chart("garage", "1.0.0").value().clone());
        store.conflict_on_update_for("garage");

        let reconciler = reconciler(&store);
        let err = reconciler.apply(chart("garage", "1.1.0")).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Conflict { ref name, .. } if name == "garage"));
    }

    #[tokio::test]
    async fn fetch_failure_aborts_before_any_write() {
        let store = MockClusterStore::new();
        store.fail_get_for("garage");
        let reconciler = reconciler(&store);

        let err = reconciler.apply(chart("garage", "1.0.0")).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Fetch { ref name, .. } if name == "garage"));
        assert_eq!(store.ops().len(), 1);
        assert!(matches!(store.ops()[0], StoreOp::Get(_)));
    }

    #[tokio::test]
    async fn apply_text_applies_every_document_in_the_blob() {
        let store = MockClusterStore::new();
        let reconciler = reconciler(&store);

        let blob = "\
apiVersion: helm.cattle.io/v1
kind: HelmChart
metadata:
  name: garage
  namespace: kube-system
spec:
  chart: garage
---
apiVersion: postgresql.cnpg.io/v1
kind: Cluster
metadata:
  name: shared-postgres
  namespace: default
spec:
  instances: 1
";
        reconciler.apply_text(blob).await.unwrap();
        assert!(store.object(&chart_coord("garage")).is_some());

        let cluster_coord = ResourceCoordinate {
            group: "postgresql.cnpg.io".to_string(),
            version: "v1".to_string(),
            kind: "Cluster".to_string(),
            resource: "clusters".to_string(),
            namespace: Some("default".to_string()),
            name: "shared-postgres".to_string(),
        };
        assert!(store.object(&cluster_coord).is_some());
    }
}
