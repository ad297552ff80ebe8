//! fixchain CLI
//!
//! Command-line access to a snapshot chain: fork, run statements, query,
//! build a whole plan, and print file digests.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fixchain")]
#[command(about = "fixchain - versioned test-fixture snapshots", long_about = None)]
struct Cli {
    /// Harness config (TOML); FIXCHAIN_SNAPSHOT_DIR / FIXCHAIN_SEED override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Materialize a snapshot from its parent, or from the seed
    Fork(commands::fork::ForkArgs),
    /// Run statements against a snapshot in place
    Exec(commands::query::ExecArgs),
    /// Run a query and print rows as JSON
    Query(commands::query::QueryArgs),
    /// Build every step of a chain plan
    Build(commands::build::BuildArgs),
    /// Print the SHA-256 of a snapshot file
    Digest(commands::digest::DigestArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => {
            fixchain_core::logging_facility::init(config.log_profile);
            let manager = fixchain_engine::SnapshotManager::new(config);
            match cli.command {
                Commands::Fork(args) => commands::fork::execute(&manager, args).await,
                Commands::Exec(args) => commands::query::execute_exec(&manager, args).await,
                Commands::Query(args) => commands::query::execute_query(&manager, args).await,
                Commands::Build(args) => commands::build::execute(&manager, args).await,
                Commands::Digest(args) => commands::digest::execute(&manager, args).await,
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
