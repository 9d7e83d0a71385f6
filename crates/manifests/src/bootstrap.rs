//! Add-on bootstrap planning
//!
//! Turns the coordinator's feature toggles into the fixed declarative
//! documents for each enabled add-on and drives them through the
//! reconciler. The two add-ons are unrelated, so each enabled toggle is
//! attempted even when an earlier one failed; the first error is still
//! returned so a partial bootstrap fails loudly.

use crate::error::ReconcileError;
use crate::reconciler::Reconciler;
use tracing::{debug, error, info};

/// Object-store add-on: Garage, installed through a HelmChart custom
/// resource picked up by the in-cluster helm controller.
pub(crate) const OBJECT_STORE_CHART: &str = r#"
apiVersion: helm.cattle.io/v1
kind: HelmChart
metadata:
  name: garage
  namespace: kube-system
spec:
  repo: https://garagehq.deuxfleurs.fr/charts
  chart: garage
  targetNamespace: garage
  createNamespace: true
  valuesContent: |-
    deployment:
      replicaCount: 1
"#;

/// Database add-on: a CloudNativePG cluster definition.
pub(crate) const DATABASE_CLUSTER: &str = r#"
apiVersion: postgresql.cnpg.io/v1
kind: Cluster
metadata:
  name: shared-postgres
  namespace: default
spec:
  instances: 1
  storage:
    size: 1Gi
"#;

/// Feature toggles received from the coordinator.
///
/// The toggles are independent: each governs one add-on and neither
/// depends on the other being enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapToggles {
    /// Deploy the Garage object store
    pub object_store: bool,
    /// Deploy the managed PostgreSQL cluster
    pub database: bool,
}

/// Constructs and applies the add-on documents for a toggle set
#[derive(Debug)]
pub struct BootstrapPlanner<'a> {
    reconciler: &'a Reconciler,
}

impl<'a> BootstrapPlanner<'a> {
    /// Create a planner over a reconciler
    #[must_use]
    pub fn new(reconciler: &'a Reconciler) -> Self {
        Self { reconciler }
    }

    /// Reconcile every enabled add-on.
    ///
    /// Disabled toggles produce no store calls at all. A failure in one
    /// add-on does not stop the remaining add-ons from being attempted;
    /// the first failure is returned once all enabled add-ons have run.
    pub async fn bootstrap(&self, toggles: &BootstrapToggles) -> Result<(), ReconcileError> {
        let addons = [
            (toggles.object_store, "object store", OBJECT_STORE_CHART),
            (toggles.database, "database", DATABASE_CLUSTER),
        ];

        let mut first_error = None;
        for (enabled, addon, documents) in addons {
            if !enabled {
                debug!("{} add-on disabled, skipping", addon);
                continue;
            }
            info!("Reconciling {} add-on", addon);
            match self.reconciler.apply_text(documents).await {
                Ok(()) => info!("{} add-on reconciled", addon),
                Err(err) => {
                    error!("Failed to reconcile {} add-on: {}", addon, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
