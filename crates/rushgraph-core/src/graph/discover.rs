//! Edge discovery from the lockfile and from workspace project manifests.
//!
//! Lockfile edges of third-party packages are classified against the
//! *source* package's manifest at the entry's version. For workspace
//! projects the lockfile marks every dependency as production, so their
//! edges are classified against the project's own manifest instead.
//! Dependencies between workspace projects are never recorded in the
//! lockfile and are synthesized from the manifests.
//!
//! Classification failures and unknown targets are logged but the edge is
//! still emitted: consumers must tolerate dangling references.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use super::edge::{Edge, EdgeOrigin, dependency_target};
use super::node::{Classification, PackageNode};
use crate::loader::ManifestLoader;
use crate::lockfile::{LockfileIndex, parse_package_key};
use crate::model::{DependencyType, Project};

/// Edges declared by third-party lockfile entries.
#[instrument(skip_all)]
pub fn discover_edges(nodes: &BTreeMap<String, PackageNode>, index: &LockfileIndex) -> Vec<Edge> {
    let mut edges = Vec::new();

    for (key, entry) in index.package_entries() {
        let Some(dependencies) = entry.dependencies.as_ref() else {
            continue;
        };
        let Some(parsed) = parse_package_key(key) else {
            continue;
        };
        let Some(source) = nodes.get(parsed.name) else {
            warn!(
                source = parsed.name,
                "source of dependency has no node; likely a stub entry of an optional dependency"
            );
            continue;
        };
        if !source.should_include() {
            debug!(source = %parsed.id(), "skipping dependencies of excluded package");
            continue;
        }

        let source_key = parsed.id();
        for (dep, resolved) in dependencies {
            let target = dependency_target(dep, resolved);
            let classification = source.classify(parsed.version, dep);
            match classification {
                Classification::Declared(_) => {}
                Classification::NoManifest => warn!(
                    source = %source_key,
                    dependency = %dep,
                    "no manifest for source of dependency at this version"
                ),
                Classification::Undeclared => warn!(
                    source = %source_key,
                    dependency = %dep,
                    "unable to determine dependency type"
                ),
            }
            if !nodes.contains_key(dep.as_str()) {
                warn!(source = %source_key, target = %target, "dependency on unknown package");
            }

            edges.push(Edge::new(
                source_key.clone(),
                target,
                classification.dependency_type(),
                EdgeOrigin::Lockfile,
            ));
        }
    }

    info!(edges = edges.len(), "discovered lockfile edges");
    edges
}

/// Edges of workspace projects, typed by each project's manifest, plus the
/// intra-workspace edges the lockfile leaves out.
///
/// # Errors
///
/// Fails if a project has no lockfile entry or its manifest cannot be read.
#[instrument(skip_all, fields(projects = projects.len()))]
pub fn discover_edges_from_projects(
    nodes: &BTreeMap<String, PackageNode>,
    index: &LockfileIndex,
    projects: &[Project],
) -> Result<Vec<Edge>> {
    let workspace: BTreeSet<&str> = projects.iter().map(|p| p.package_name.as_str()).collect();
    let mut edges = Vec::new();

    for project in projects {
        let entry = index
            .resolve(project)
            .with_context(|| format!("resolve lockfile entry of project {}", project.package_name))?;
        let manifest = ManifestLoader::read_project_manifest(project)
            .with_context(|| format!("read manifest of project {}", project.package_name))?;
        let source = if manifest.name.is_empty() {
            project.package_name.clone()
        } else {
            manifest.name.clone()
        };

        for (dep, resolved) in entry.dependencies.iter().flatten() {
            let target = dependency_target(dep, resolved);
            let kind = manifest.classify(dep).unwrap_or_else(|| {
                warn!(
                    source = %source,
                    dependency = %dep,
                    "lockfile dependency not declared in project manifest"
                );
                DependencyType::Unknown
            });
            if !nodes.contains_key(dep.as_str()) {
                warn!(source = %source, target = %target, "dependency on unknown package");
            }
            edges.push(Edge::new(source.clone(), target, kind, EdgeOrigin::Lockfile));
        }

        let sections = [
            (&manifest.dependencies, DependencyType::Prod),
            (&manifest.dev_dependencies, DependencyType::Dev),
            (&manifest.peer_dependencies, DependencyType::Peer),
        ];
        for (section, kind) in sections {
            for dep in section.keys().filter(|dep| workspace.contains(dep.as_str())) {
                edges.push(Edge::new(source.clone(), dep.clone(), kind, EdgeOrigin::Workspace));
            }
        }
    }

    info!(edges = edges.len(), "discovered workspace project edges");
    Ok(edges)
}
