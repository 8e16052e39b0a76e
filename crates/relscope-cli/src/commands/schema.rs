//! Schema commands
//!
//! Usage: relscope schema check <PATH>
//!        relscope schema show <PATH>

use clap::{Args, Subcommand};
use relscope_store::parse_schema_file;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Validate a schema file
    Check(SchemaPathArgs),
    /// List entities and their relations
    Show(SchemaPathArgs),
}

#[derive(Debug, Args)]
pub struct SchemaPathArgs {
    /// Path to schema YAML file
    pub path: PathBuf,
}

/// Execute schema command
pub fn execute(args: SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SchemaCommand::Check(path_args) => execute_check(path_args),
        SchemaCommand::Show(path_args) => execute_show(path_args),
    }
}

fn execute_check(args: SchemaPathArgs) -> Result<(), Box<dyn std::error::Error>> {
    let schema = parse_schema_file(&args.path)?;
    let relations: usize = schema.entities.values().map(|e| e.relations.len()).sum();

    println!(
        "✓ {} is valid ({} entities, {} relations)",
        args.path.display(),
        schema.entities.len(),
        relations
    );
    Ok(())
}

fn execute_show(args: SchemaPathArgs) -> Result<(), Box<dyn std::error::Error>> {
    let schema = parse_schema_file(&args.path)?;

    for (name, entity) in &schema.entities {
        println!("{} (table {}, key {})", name, entity.table, entity.primary_key);
        for (relation_name, relation) in &entity.relations {
            println!(
                "  {} -> {} [{}]",
                relation_name,
                relation.entity,
                relation.kind.as_str()
            );
        }
    }
    Ok(())
}
