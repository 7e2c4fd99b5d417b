use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::output::{OutputMode, render};

/// Arguments for `rushgraph graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Repository root containing rush.json.
    #[arg(value_name = "REPO_ROOT")]
    pub repo_root: PathBuf,

    /// Directory the statement file is written to (created if missing).
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

/// Build the dependency graph and write `deps.nq`.
///
/// # Errors
///
/// Returns an error if any input is missing or malformed, or if the output
/// cannot be written.
pub fn run_graph(args: &GraphArgs, output: OutputMode) -> Result<()> {
    let report = rushgraph_core::create_graph(&args.repo_root, &args.output_dir)?;
    render(output, &report, |r, w| {
        writeln!(
            w,
            "graph: projects={} nodes={}/{} edges={} (workspace={}) statements={} output={}",
            r.projects,
            r.included_nodes,
            r.nodes,
            r.edges,
            r.workspace_edges,
            r.statements,
            r.output.display()
        )?;
        writeln!(w, "digest: {}", r.digest)
    })
}
