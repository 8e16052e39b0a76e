//! relscope CLI
//!
//! Command-line interface for composing and running relationship-aware
//! queries against a SQLite database

use clap::{Parser, Subcommand};
use relscope_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "relscope")]
#[command(about = "relscope - relationship-aware query composition", long_about = None)]
struct Cli {
    /// Log composition and execution to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compose a query and print its SQL or its rows
    Query(commands::query::QueryArgs),
    /// Schema file operations
    Schema(commands::schema::SchemaArgs),
}

fn main() {
    let cli = Cli::parse();

    // quiet unless asked: --verbose, or RUST_LOG for structured output
    let profile = if cli.verbose {
        Profile::Development
    } else if std::env::var_os("RUST_LOG").is_some() {
        Profile::Production
    } else {
        Profile::Test
    };
    init(profile);

    let result = match cli.command {
        Commands::Query(args) => commands::query::execute(args),
        Commands::Schema(args) => commands::schema::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
