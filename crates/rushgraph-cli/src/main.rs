#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rushgraph: dependency graph of a rush monorepo",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Write the dependency graph of a workspace as a statement file",
        after_help = "EXAMPLES:\n    # Write ./out/deps.nq for the repository in ./monorepo\n    rushgraph graph ./monorepo ./out"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        about = "Project a statement file into a new SQLite node/edge database",
        after_help = "EXAMPLES:\n    # Refuses to run if deps.db already exists\n    rushgraph sqlite ./out/deps.nq ./out/deps.db"
    )]
    Sqlite(cmd::sqlite::SqliteArgs),

    #[command(about = "Generate shell completion scripts")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RUSHGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "rushgraph=debug,info"
        } else {
            "rushgraph=info,warn"
        })
    });

    let format = env::var("RUSHGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let output = cli.output_mode();
    match cli.command {
        Commands::Graph(ref args) => cmd::graph::run_graph(args, output),
        Commands::Sqlite(ref args) => cmd::sqlite::run_sqlite(args, output),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors exit 1; --help and --version exit 0.
            let code = u8::from(err.use_stderr());
            if let Err(print_err) = err.print() {
                eprintln!("{print_err}");
            }
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let output = cli.output_mode();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render_err) = render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
