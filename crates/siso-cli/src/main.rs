//! # siso CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use siso_cli::convert::{run_convert, run_emit, ConvertArgs, EmitArgs};
use siso_cli::query::{run_domain, run_list, run_resolve, ListCommand, OutputFormat, ResolveArgs};
use siso_cli::source::load_options;

/// SISO entity-type taxonomy toolkit.
///
/// Resolves 64-bit entity-type keys to descriptions, enumerates and searches
/// the taxonomy, and converts the reference document between XML and JSON.
#[derive(Parser, Debug)]
#[command(name = "siso", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Loader options file (YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format for query results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a key to its best-matching entity-type description.
    Resolve(ResolveArgs),

    /// Resolve the kind and domain of a key to a domain description.
    Domain(ResolveArgs),

    #[command(flatten)]
    List(ListCommand),

    /// Convert a reference document to its JSON tree.
    Convert(ConvertArgs),

    /// Write a JSON or YAML tree back out as XML.
    Emit(EmitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = load_options(cli.config.as_deref()).and_then(|options| match &cli.command {
        Commands::Resolve(args) => run_resolve(args, options, cli.format),
        Commands::Domain(args) => run_domain(args, options, cli.format),
        Commands::List(command) => run_list(command, options, cli.format),
        Commands::Convert(args) => run_convert(args, options),
        Commands::Emit(args) => run_emit(args, options),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity picks the level.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
