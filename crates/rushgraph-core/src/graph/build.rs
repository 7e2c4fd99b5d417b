//! Node discovery: one [`PackageNode`] per distinct package name.
//!
//! Workspace projects are seeded first so they own their node even when the
//! lockfile also lists a published version of the same name. Every other
//! lockfile key contributes a `(name, version)` pair; a version is kept only
//! if its manifest can be located.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::node::PackageNode;
use crate::loader::{ManifestLoader, ManifestLookup};
use crate::lockfile::{LockfileIndex, parse_package_key};
use crate::model::Project;

/// Counters collected while discovering nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeStats {
    /// Versions whose manifest was located.
    pub versions_resolved: usize,
    /// Versions listed in the lockfile but not installed.
    pub versions_not_installed: usize,
    /// Lockfile keys that could not be split into name and version.
    pub malformed_keys: usize,
}

/// Build the node set from workspace projects and lockfile package keys.
///
/// # Errors
///
/// Returns an error if a manifest exists on disk but cannot be read or
/// parsed. Absent manifests are not errors.
#[instrument(skip_all, fields(projects = projects.len()))]
pub fn build_nodes(
    loader: &ManifestLoader,
    projects: &[Project],
    index: &LockfileIndex,
) -> Result<(BTreeMap<String, PackageNode>, NodeStats)> {
    let mut nodes: BTreeMap<String, PackageNode> = projects
        .iter()
        .map(|project| {
            (
                project.package_name.clone(),
                PackageNode::for_project(project.clone()),
            )
        })
        .collect();
    let mut stats = NodeStats::default();

    for (key, _) in index.package_entries() {
        let Some(parsed) = parse_package_key(key) else {
            warn!(key, "skipping lockfile key without name/version");
            stats.malformed_keys += 1;
            continue;
        };

        let node = nodes
            .entry(parsed.name.to_string())
            .or_insert_with(|| PackageNode::new(parsed.name));
        if node.has_version(parsed.version) {
            continue;
        }

        let lookup = loader
            .lookup_version(parsed.name, parsed.version, node.project.as_ref())
            .with_context(|| format!("read manifest of {}", parsed.id()))?;

        match lookup {
            ManifestLookup::Found(manifest) => {
                debug!(package = parsed.name, version = parsed.version, "resolved version");
                node.add_version(parsed.version, manifest);
                stats.versions_resolved += 1;
            }
            ManifestLookup::NotInstalled { expected } => {
                warn!(
                    package = parsed.name,
                    version = parsed.version,
                    expected = %expected.display(),
                    "likely optional dependency: version not installed"
                );
                stats.versions_not_installed += 1;
            }
        }
    }

    info!(
        nodes = nodes.len(),
        versions_resolved = stats.versions_resolved,
        versions_not_installed = stats.versions_not_installed,
        "discovered package nodes"
    );

    Ok((nodes, stats))
}
