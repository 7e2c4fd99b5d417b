//! Graph → statements.

use tracing::warn;

use super::Statement;
use super::vocab;
use crate::graph::{Edge, PackageGraph, PackageNode};
use crate::model::Manifest;
use crate::model::manifest::UNKNOWN_LICENSE;

/// Converts a [`PackageGraph`] into statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleEncoder {
    emit_descriptions: bool,
}

impl TripleEncoder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            emit_descriptions: false,
        }
    }

    /// Also emit a `description` literal per version.
    #[must_use]
    pub const fn with_descriptions(mut self, enabled: bool) -> Self {
        self.emit_descriptions = enabled;
        self
    }

    /// All statements for the graph: included nodes first, then every edge.
    #[must_use]
    pub fn encode(&self, graph: &PackageGraph) -> Vec<Statement> {
        let mut statements: Vec<Statement> = graph
            .included_nodes()
            .flat_map(|node| self.node_statements(node))
            .collect();
        statements.extend(graph.edges.iter().map(Self::edge_statement));
        statements
    }

    /// Statements describing one node. Callers are responsible for skipping
    /// nodes that fail [`PackageNode::should_include`].
    #[must_use]
    pub fn node_statements(&self, node: &PackageNode) -> Vec<Statement> {
        let name = node.name.as_str();
        let mut out = vec![Statement::label(name, vocab::NAME, name)];

        for (version, manifest) in &node.versions {
            self.version_statements(name, version, manifest, &mut out);
        }

        match &node.project {
            Some(project) => {
                let visibility = if project.should_publish {
                    vocab::PUBLIC
                } else {
                    vocab::PRIVATE
                };
                out.push(Statement::link(name, vocab::HAS_VISIBILITY, visibility));
                out.push(Statement::link(name, vocab::HAS_ROLE, vocab::ROLE_PRIMARY));
            }
            None => out.push(Statement::link(name, vocab::HAS_ROLE, vocab::ROLE_PACKAGE)),
        }

        out
    }

    fn version_statements(
        &self,
        name: &str,
        version: &str,
        manifest: &Manifest,
        out: &mut Vec<Statement>,
    ) {
        let version_id = format!("{name}/{version}");
        let license = manifest.license_label().unwrap_or_else(|| {
            warn!(
                package = %version_id,
                manifest = %manifest.path.display(),
                "no license indication"
            );
            UNKNOWN_LICENSE.to_string()
        });

        out.push(Statement::link(name, vocab::HAS_VERSION, &version_id));
        out.push(Statement::label(&version_id, vocab::NAME, version));
        out.push(Statement::label(&version_id, vocab::LICENSE, &license));

        if self.emit_descriptions
            && let Some(description) = manifest.description.as_deref()
        {
            out.push(Statement::label(&version_id, vocab::DESCRIPTION, description));
        }
        if let Some(repository) = manifest.repository_url() {
            out.push(Statement::link(&version_id, vocab::LIVES_IN, repository));
        }
        for keyword in &manifest.keywords {
            out.push(Statement::label(&version_id, vocab::KEYWORD, keyword));
        }

        out.push(Statement::link(&version_id, vocab::HAS_ROLE, vocab::ROLE_DEPENDENCY));
    }

    #[must_use]
    pub fn edge_statement(edge: &Edge) -> Statement {
        Statement::link(&edge.source, &edge.kind.predicate(), &edge.target)
    }
}
