//! relscope core - relationship-aware query composition
//!
//! Helpers that extend a query over one entity with:
//! - conditional filters that are skipped when their input is absent
//! - substring search and membership filters addressed by dot-paths
//!   (`author.profile.bio`), traversing relationships via existence subqueries
//! - OR-grouped search across several paths
//! - projection and ordering through relationship chains via correlated
//!   scalar subqueries
//!
//! The helpers are generic over [`QueryBuilder`], the capability set of the
//! underlying data-access layer. `relscope-store` provides a SQL
//! implementation.

pub mod builder;
pub mod conditional;
pub mod errors;
pub mod logging_facility;
pub mod operator;
pub mod path;
pub mod predicate;
pub mod projection;
pub mod scope_ext;
pub mod search;
pub mod value;

// Used by the exported logging macros
pub use relscope_core_types;

// Re-export commonly used types
pub use builder::QueryBuilder;
pub use conditional::when;
pub use errors::{ExError, ExErrorKind, ScopeError};
pub use operator::{Direction, Operator};
pub use path::AttributePath;
pub use predicate::{search, when_where, when_where_in, where_date_between};
pub use projection::{nested_select, order, order_by_path, select_related};
pub use scope_ext::ScopeExt;
pub use search::search_any;
pub use value::{Truthy, Value};
