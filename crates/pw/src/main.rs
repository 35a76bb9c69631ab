//! Pagewright CLI - prompt-driven static site editor.
//!
//! Provides commands for:
//! - `serve`: Start the pipeline server
//! - `history`: List snapshot versions
//! - `rollback`: Restore a snapshot

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{HistoryArgs, RollbackArgs, ServeArgs};
use output::Output;

/// Pagewright - prompt-driven site revision pipeline.
#[derive(Parser)]
#[command(name = "pw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the pipeline server.
    Serve(ServeArgs),
    /// List snapshot versions.
    History(HistoryArgs),
    /// Restore a snapshot.
    Rollback(RollbackArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for serve command
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
        Commands::History(args) => args.execute(),
        Commands::Rollback(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
