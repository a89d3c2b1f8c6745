//! Redline CLI - compare two documents through the native redlines engine
//!
//! This binary exposes the engine adapter: running a comparison, extracting
//! the bundled binary ahead of time, and reporting what this host needs.

use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use redlines_cli::commands;

/// Redline - tracked-changes comparison of office documents
#[derive(Parser)]
#[command(name = "redline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory the native binary is extracted into (default: $REDLINES_TARGET_DIR, then <install dir>/bin)
    #[arg(long, global = true)]
    target_dir: Option<String>,

    /// Directory holding the bundled archives (default: $REDLINES_BUNDLE_DIR, then <install dir>/dist)
    #[arg(long, global = true)]
    bundle_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redline a modified document against the original
    Compare {
        /// Author label recorded on every tracked change
        #[arg(short, long)]
        author: String,

        /// Path to the original document
        #[arg(long)]
        original: String,

        /// Path to the modified document
        #[arg(long)]
        modified: String,

        /// Where to write the redlined document
        #[arg(short, long)]
        output: String,

        /// Kill the engine if it runs longer than this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Extract the native binary for this platform
    Install {
        /// Re-extract even if the binary is already present
        #[arg(long)]
        force: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the platform, artifact and binary location without extracting
    Info {
        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::engine_config(cli.target_dir.as_deref(), cli.bundle_dir.as_deref());

    let result = match cli.command {
        Commands::Compare {
            author,
            original,
            modified,
            output,
            timeout_secs,
            json,
        } => {
            let config = match timeout_secs {
                Some(secs) => config.timeout_secs(secs),
                None => config,
            };
            let args = commands::compare::CompareArgs {
                author: &author,
                original: Path::new(&original),
                modified: Path::new(&modified),
                output: Path::new(&output),
            };
            commands::compare::run(config, &args, json)
        }
        Commands::Install { force, json } => commands::install::run(config, force, json),
        Commands::Info { json } => commands::info::run(config, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
