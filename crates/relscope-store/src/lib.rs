//! relscope store - SQL rendering and SQLite execution
//!
//! Provides:
//! - Entity/relationship schema loaded from YAML
//! - `SqlQuery`, a [`relscope_core::QueryBuilder`] that renders parameterised
//!   SQL with correlated subqueries for every relationship kind
//! - Execution of composed queries against SQLite

pub mod db;
pub mod errors;
pub mod exec;
pub mod query;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use exec::{count_rows, fetch_rows, Row};
pub use query::SqlQuery;
pub use schema::{parse_schema_file, parse_schema_str, EntityDef, RelationDef, RelationKind, Schema};
