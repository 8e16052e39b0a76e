//! The data-access capability set
//!
//! Every composition helper in this crate is generic over [`QueryBuilder`].
//! The trait is deliberately small: single-entity predicates, grouped
//! boolean expressions, relationship existence subqueries, and raw
//! fragment + bindings injection points for projection and ordering.
//! Relationship resolution and SQL generation belong to the implementor.

use crate::errors::ScopeError;
use crate::operator::{Direction, Operator};
use crate::value::Value;

/// A query over one entity type that the composition helpers can extend
///
/// Predicates added through `where_*` are AND-combined with whatever the
/// query already holds, except inside [`QueryBuilder::or_where_group`].
///
/// Patterns passed to [`QueryBuilder::where_like`] use `\` as the escape
/// character for literal `%`, `_` and `\`.
pub trait QueryBuilder: Sized {
    /// Error type of the underlying layer
    ///
    /// Must absorb [`ScopeError`] so the helpers can report path problems
    /// through the same channel as schema and persistence failures.
    type Error: From<ScopeError>;

    /// Name of the entity this query ranges over
    fn entity_name(&self) -> &str;

    /// `column <operator> value`
    fn where_compare(
        &mut self,
        column: &str,
        operator: Operator,
        value: Value,
    ) -> Result<(), Self::Error>;

    /// `column IN (values…)`
    fn where_in(&mut self, column: &str, values: Vec<Value>) -> Result<(), Self::Error>;

    /// `date(column) <operator> value`
    fn where_date(
        &mut self,
        column: &str,
        operator: Operator,
        value: Value,
    ) -> Result<(), Self::Error>;

    /// `column LIKE pattern`
    fn where_like(&mut self, column: &str, pattern: String) -> Result<(), Self::Error>;

    /// AND-combine a parenthesised group built by `build`
    ///
    /// A group that ends up empty adds nothing to the query.
    fn where_group<F>(&mut self, build: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// OR-combine a parenthesised group built by `build`
    ///
    /// Used for the disjuncts inside a [`QueryBuilder::where_group`]; the first
    /// disjunct of a group carries no leading connector.
    fn or_where_group<F>(&mut self, build: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>;

    /// Resolve `relation` on this query's entity and return a fresh query
    /// over the related entity, correlated to this one
    ///
    /// # Errors
    ///
    /// The implementor's unknown-relationship error when the entity does not
    /// declare `relation`.
    fn relation_existence_query(&self, relation: &str) -> Result<Self, Self::Error>;

    /// AND-combine `EXISTS (subquery)`
    fn where_exists(&mut self, subquery: Self) -> Result<(), Self::Error>;

    /// Relationship existence predicate scoped to `relation`
    ///
    /// Opens the correlated subquery, lets `build` constrain it, then
    /// AND-combines its existence into this query.
    fn where_has<F>(&mut self, relation: &str, build: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        let mut subquery = self.relation_existence_query(relation)?;
        build(&mut subquery)?;
        self.where_exists(subquery)
    }

    /// Project a single column of this query's entity
    fn select_column(&mut self, column: &str) -> Result<(), Self::Error>;

    /// Project a raw SQL fragment with its positional bindings
    fn select_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<(), Self::Error>;

    /// Project a raw SQL fragment under an alias
    fn select_raw_as(
        &mut self,
        sql: &str,
        bindings: Vec<Value>,
        alias: &str,
    ) -> Result<(), Self::Error> {
        self.select_raw(&format!("{} AS {}", sql, quote_ident(alias)), bindings)
    }

    /// `ORDER BY column direction`
    fn order_by(&mut self, column: &str, direction: Direction) -> Result<(), Self::Error>;

    /// `ORDER BY <sql>` with positional bindings
    fn order_by_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<(), Self::Error>;

    /// Cap the number of rows returned
    fn limit(&mut self, count: u64) -> Result<(), Self::Error>;

    /// Render the query as SQL with positional placeholders
    fn to_sql(&self) -> String;

    /// Bindings in placeholder order
    fn bindings(&self) -> Vec<Value>;
}

/// Quote an identifier with double quotes, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
