//! Schema parser with validation
//!
//! Parses YAML and validates schema version, table uniqueness, relation
//! targets, relation key fields and declared columns

use crate::errors::{entity_validation, io_error, schema_validation, Result};
use crate::schema::format_v1::{EntityDef, JoinKeys, Schema};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Supported `schema_version`
pub const SCHEMA_VERSION: u32 = 1;

/// Parse a schema file from a path
pub fn parse_schema_file(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path).map_err(|e| {
        let message = format!("Failed to read schema file {}: {}", path.display(), e);
        io_error("schema_read", e).with_message(message)
    })?;

    parse_schema_str(&content)
}

/// Parse a schema from a string
pub fn parse_schema_str(content: &str) -> Result<Schema> {
    let schema: Schema = serde_yaml::from_str(content)
        .map_err(|e| schema_validation(&format!("YAML parse error: {}", e)))?;

    validate_schema(&schema)?;

    tracing::debug!(
        component = module_path!(),
        op = "schema_parse",
        entity_count = schema.entities.len(),
    );

    Ok(schema)
}

fn validate_schema(schema: &Schema) -> Result<()> {
    if schema.schema_version != SCHEMA_VERSION {
        return Err(schema_validation(&format!(
            "Unsupported schema_version: {}. Expected {}",
            schema.schema_version, SCHEMA_VERSION
        )));
    }

    if schema.entities.is_empty() {
        return Err(schema_validation("Schema declares no entities"));
    }

    let mut tables: HashMap<&str, &str> = HashMap::new();
    for (name, entity) in &schema.entities {
        if name.is_empty() || name.contains('.') {
            return Err(entity_validation(
                name,
                &format!("Invalid entity name '{}'", name),
            ));
        }
        if entity.table.is_empty() {
            return Err(entity_validation(name, "Entity table must not be empty"));
        }
        if let Some(other) = tables.insert(entity.table.as_str(), name.as_str()) {
            return Err(entity_validation(
                name,
                &format!(
                    "Table '{}' is already used by entity '{}'",
                    entity.table, other
                ),
            ));
        }
        if !entity.has_column(&entity.primary_key) {
            return Err(entity_validation(
                name,
                &format!("Primary key '{}' is not a declared column", entity.primary_key),
            ));
        }

        validate_relations(schema, name, entity)?;
    }

    Ok(())
}

fn validate_relations(schema: &Schema, name: &str, entity: &EntityDef) -> Result<()> {
    for (relation_name, relation) in &entity.relations {
        if relation_name.is_empty() || relation_name.contains('.') {
            return Err(entity_validation(
                name,
                &format!("Invalid relation name '{}'", relation_name),
            ));
        }

        let related = schema.entities.get(&relation.entity).ok_or_else(|| {
            entity_validation(
                name,
                &format!(
                    "Relation '{}' targets unknown entity '{}'",
                    relation_name, relation.entity
                ),
            )
        })?;

        let keys = relation
            .join_keys(entity, related)
            .map_err(|reason| {
                entity_validation(name, &format!("Relation '{}': {}", relation_name, reason))
            })?;

        let (parent_column, related_column) = match keys {
            JoinKeys::Direct {
                related_column,
                parent_column,
            } => (parent_column, related_column),
            JoinKeys::Pivot {
                parent_column,
                related_column,
                ..
            } => (parent_column, related_column),
        };

        if !entity.has_column(parent_column) {
            return Err(entity_validation(
                name,
                &format!(
                    "Relation '{}' joins on undeclared column '{}'",
                    relation_name, parent_column
                ),
            ));
        }
        if !related.has_column(related_column) {
            return Err(entity_validation(
                name,
                &format!(
                    "Relation '{}' joins on undeclared column '{}.{}'",
                    relation_name, relation.entity, related_column
                ),
            ));
        }
    }

    Ok(())
}
