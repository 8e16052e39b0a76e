//! Entity/relationship schema
//!
//! Tells [`SqlQuery`](crate::query::SqlQuery) which table backs each entity,
//! which columns it may reference and how each named relationship joins.

pub mod format_v1;
pub mod parser;

pub use format_v1::{EntityDef, JoinKeys, RelationDef, RelationKind, Schema};
pub use parser::{parse_schema_file, parse_schema_str};
