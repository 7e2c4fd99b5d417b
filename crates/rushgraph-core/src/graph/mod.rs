//! Typed in-memory package dependency graph.
//!
//! Construction runs in three steps over the same inputs:
//! 1. [`build::build_nodes`]: nodes for workspace projects and lockfile keys
//! 2. [`discover::discover_edges`]: third-party lockfile edges
//! 3. [`discover::discover_edges_from_projects`]: workspace project edges
//!
//! The graph is only serialized once complete (see [`crate::nquads`]).

pub mod build;
pub mod create;
pub mod discover;
pub mod edge;
pub mod node;

use std::collections::BTreeMap;

use anyhow::Result;

pub use build::NodeStats;
pub use create::{GraphReport, create_graph};
pub use edge::{Edge, EdgeOrigin};
pub use node::{Classification, PackageNode};

use crate::loader::ManifestLoader;
use crate::lockfile::LockfileIndex;
use crate::model::Project;

#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    /// Every discovered package, included or not, keyed by name.
    pub nodes: BTreeMap<String, PackageNode>,
    /// Lockfile edges followed by workspace project edges.
    pub edges: Vec<Edge>,
    pub stats: NodeStats,
}

impl PackageGraph {
    /// Build the complete graph.
    ///
    /// # Errors
    ///
    /// Fails on unreadable manifests and on workspace projects missing from
    /// the lockfile.
    pub fn build(
        loader: &ManifestLoader,
        projects: &[Project],
        index: &LockfileIndex,
    ) -> Result<Self> {
        let (nodes, stats) = build::build_nodes(loader, projects, index)?;
        let mut edges = discover::discover_edges(&nodes, index);
        edges.extend(discover::discover_edges_from_projects(&nodes, index, projects)?);
        Ok(Self {
            nodes,
            edges,
            stats,
        })
    }

    /// Nodes that appear in serialized output.
    pub fn included_nodes(&self) -> impl Iterator<Item = &PackageNode> {
        self.nodes.values().filter(|node| node.should_include())
    }
}
