//! Full graph build: repository → statement file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use super::{EdgeOrigin, PackageGraph};
use crate::config::load_config;
use crate::loader::ManifestLoader;
use crate::lockfile::LockfileIndex;
use crate::nquads::{TripleEncoder, write_statements};

// ---------------------------------------------------------------------------
// GraphReport
// ---------------------------------------------------------------------------

/// Report returned after writing the statement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    /// Workspace projects listed in the workspace manifest.
    pub projects: usize,
    /// Nodes discovered, included or not.
    pub nodes: usize,
    /// Nodes written to the output.
    pub included_nodes: usize,
    pub versions_resolved: usize,
    /// Lockfile versions skipped because nothing is installed for them.
    pub versions_not_installed: usize,
    pub edges: usize,
    /// Edges between workspace projects, which the lockfile does not record.
    pub workspace_edges: usize,
    pub statements: usize,
    pub output: PathBuf,
    /// `blake3:<hex>` digest of the written file.
    pub digest: String,
}

// ---------------------------------------------------------------------------
// create_graph
// ---------------------------------------------------------------------------

/// Build the dependency graph of the workspace at `repo_root` and write it
/// to `output_dir`.
///
/// 1. Loads `.rushgraph.toml` (defaults if absent)
/// 2. Reads the workspace manifest and the lockfile
/// 3. Builds the typed graph
/// 4. Encodes it and writes one statement per line
///
/// # Errors
///
/// Fails on any fatal input condition (missing or unparseable workspace
/// manifest or lockfile, project missing from the lockfile, unreadable
/// package manifest) or if the output cannot be written.
#[instrument(skip_all, fields(repo_root = %repo_root.display()))]
pub fn create_graph(repo_root: &Path, output_dir: &Path) -> Result<GraphReport> {
    let config = load_config(repo_root).context("load config")?;
    let loader = ManifestLoader::new(repo_root, &config);

    let projects = loader.load_projects().context("load workspace projects")?;
    info!(projects = projects.len(), "loaded workspace manifest");
    let lockfile = loader.load_lockfile().context("load lockfile")?;
    info!(entries = lockfile.packages.len(), "loaded lockfile");
    let index = LockfileIndex::new(lockfile, config.lockfile.project_key_prefix.clone());

    let graph = PackageGraph::build(&loader, &projects, &index)?;
    let included_nodes = graph.included_nodes().count();

    let statements = TripleEncoder::new()
        .with_descriptions(config.output.emit_descriptions)
        .encode(&graph);
    let mut buf = Vec::new();
    write_statements(&mut buf, &statements).context("render statements")?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let output = output_dir.join(&config.output.file_name);
    std::fs::write(&output, &buf)
        .with_context(|| format!("write statement file {}", output.display()))?;
    let digest = format!("blake3:{}", blake3::hash(&buf).to_hex());

    let report = GraphReport {
        projects: projects.len(),
        nodes: graph.nodes.len(),
        included_nodes,
        versions_resolved: graph.stats.versions_resolved,
        versions_not_installed: graph.stats.versions_not_installed,
        edges: graph.edges.len(),
        workspace_edges: graph
            .edges
            .iter()
            .filter(|edge| edge.origin == EdgeOrigin::Workspace)
            .count(),
        statements: statements.len(),
        output,
        digest,
    };
    info!(
        nodes = report.included_nodes,
        edges = report.edges,
        workspace_edges = report.workspace_edges,
        statements = report.statements,
        output = %report.output.display(),
        "statement file written"
    );
    Ok(report)
}
