//! Resource coordinate resolution
//!
//! Maps a document's `apiVersion`/`kind` to the plural REST resource name
//! the cluster API serves it under, and assembles the full
//! [`ResourceCoordinate`] for the store.

use crate::document::Manifest;
use crate::error::ReconcileError;
use cluster_store::ResourceCoordinate;

/// Fixed kind → plural resource overrides for the kinds the agent applies.
/// The override table is the primary mechanism; the fallback below is a
/// heuristic and must not be extended silently.
const PLURAL_OVERRIDES: &[(&str, &str)] = &[("HelmChart", "helmcharts"), ("Cluster", "clusters")];

/// Resolve a kind to its plural REST resource name.
///
/// Total and deterministic: unknown kinds fall back to the lowercased kind
/// with an appended `"s"`. That fallback is an approximation that holds for
/// the small, known manifest set this agent applies — it is not English
/// pluralization. A kind outside that set should either be added to the
/// override table or resolved through API discovery instead.
#[must_use]
pub fn plural_resource(kind: &str) -> String {
    for (known, plural) in PLURAL_OVERRIDES {
        if *known == kind {
            return (*plural).to_string();
        }
    }
    format!("{}s", kind.to_lowercase())
}

/// Derive the store coordinate for a document.
///
/// Fails only when the document is missing `apiVersion`, `kind` or
/// `metadata.name`; the plural mapping itself has no failure path.
pub fn resolve(manifest: &Manifest) -> Result<ResourceCoordinate, ReconcileError> {
    let api_version = manifest.api_version()?;
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        // Core-group resources carry a bare version ("v1")
        None => (String::new(), api_version.to_string()),
    };
    let kind = manifest.kind()?;
    let name = manifest.name()?;

    Ok(ResourceCoordinate {
        group,
        version,
        kind: kind.to_string(),
        resource: plural_resource(kind),
        namespace: manifest.namespace().map(str::to_string),
        name: name.to_string(),
    })
}
