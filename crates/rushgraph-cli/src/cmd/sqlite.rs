use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rushgraph_core::config::DEFAULT_NAMESPACE;

use crate::output::{OutputMode, render};

/// Arguments for `rushgraph sqlite`.
#[derive(Args, Debug)]
pub struct SqliteArgs {
    /// Statement file written by `rushgraph graph`.
    #[arg(value_name = "STATEMENTS")]
    pub statements: PathBuf,

    /// SQLite file to create. Must not exist.
    #[arg(value_name = "DB_FILE")]
    pub db: PathBuf,

    /// Namespace relative identifiers resolve against and are stored without.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

/// Project a statement file into a new SQLite node/edge store.
///
/// # Errors
///
/// Returns an error if the output exists, the statement file is malformed,
/// or the store cannot be written.
pub fn run_sqlite(args: &SqliteArgs, output: OutputMode) -> Result<()> {
    let report = rushgraph_core::create_sqlite_db(&args.statements, &args.db, &args.namespace)?;
    render(output, &report, |r, w| {
        writeln!(
            w,
            "sqlite: statements={} nodes={} labels={} edges={} db={}",
            r.statements,
            r.node_rows,
            r.label_rows,
            r.edge_rows,
            args.db.display()
        )
    })
}
