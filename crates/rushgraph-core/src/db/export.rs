//! Statement file → relational store.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{Store, ensure_absent};
use crate::nquads::parse_statements;
use crate::relational::RelationalProjector;

/// Report returned after exporting a statement file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Statements read from the input file.
    pub statements: usize,
    /// Node rows written, entities and labels together.
    pub node_rows: usize,
    /// Node rows flagged as labels.
    pub label_rows: usize,
    pub edge_rows: usize,
}

/// Parse `from`, project it and write a new SQLite file at `to`.
///
/// Nothing is read or written if `to` already exists. If writing fails after
/// the file was created, the file is removed.
///
/// # Errors
///
/// Fails if `to` exists, if `from` cannot be read or parsed, or if the store
/// cannot be written.
#[instrument(skip_all, fields(from = %from.display(), to = %to.display()))]
pub fn create_sqlite_db(from: &Path, to: &Path, namespace: &str) -> Result<ExportReport> {
    ensure_absent(to)?;

    let content = std::fs::read_to_string(from)
        .with_context(|| format!("read statement file {}", from.display()))?;
    let statements = parse_statements(&content, namespace)
        .with_context(|| format!("parse statement file {}", from.display()))?;

    let mut projector = RelationalProjector::new(namespace);
    projector.project_all(&statements);
    let tables = projector.finish();
    info!(nodes = tables.nodes.len(), edges = tables.edges.len(), "projected statements");

    let mut store = Store::create(to)?;
    if let Err(err) = store.write(&tables) {
        drop(store);
        if let Err(remove_err) = std::fs::remove_file(to) {
            warn!(path = %to.display(), error = %remove_err, "could not remove partial store");
        }
        return Err(err).with_context(|| format!("write relational store {}", to.display()));
    }
    store
        .close()
        .with_context(|| format!("close relational store {}", to.display()))?;

    let report = ExportReport {
        statements: statements.len(),
        node_rows: tables.nodes.len(),
        label_rows: tables.label_count(),
        edge_rows: tables.edges.len(),
    };
    info!(
        node_rows = report.node_rows,
        label_rows = report.label_rows,
        edge_rows = report.edge_rows,
        "relational store written"
    );
    Ok(report)
}
