//! SQL implementation of [`QueryBuilder`]
//!
//! The root query references its table unaliased; each relationship
//! subquery aliases its table as `<table>_<depth>` so a relationship back
//! to the same table (`users.manager`) stays unambiguous. Every column is
//! qualified with the table reference and double-quoted.

pub mod clause;
pub mod writer;

use crate::errors::{entity_validation, Result};
use crate::schema::{JoinKeys, Schema};
use clause::{Clause, Connector, Predicate};
use relscope_core::builder::quote_ident;
use relscope_core::errors::ExError;
use relscope_core::{Direction, Operator, QueryBuilder, ScopeError, Value};
use std::sync::Arc;
use writer::SqlWriter;

/// SQL text plus the bindings for its placeholders
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub(crate) sql: String,
    pub(crate) bindings: Vec<Value>,
}

impl Fragment {
    fn plain(sql: String) -> Self {
        Self {
            sql,
            bindings: Vec::new(),
        }
    }
}

/// Pivot table joined into a `belongs_to_many` subquery
#[derive(Debug, Clone)]
pub(crate) struct PivotJoin {
    pub(crate) table: String,
    pub(crate) alias: String,
    pub(crate) on: String,
}

/// A SELECT over one entity of a [`Schema`]
///
/// # Example
///
/// ```
/// use relscope_core::{search_any, QueryBuilder};
/// use relscope_store::{parse_schema_str, SqlQuery};
/// use std::sync::Arc;
///
/// let schema = parse_schema_str(
///     "schema_version: 1\nentities:\n  users:\n    table: users\n",
/// )
/// .unwrap();
/// let mut query = SqlQuery::new(Arc::new(schema), "users").unwrap();
/// search_any(&mut query, &["name", "email"], "ann").unwrap();
///
/// assert_eq!(
///     query.to_sql(),
///     "SELECT \"users\".* FROM \"users\" WHERE ((\"users\".\"name\" LIKE ? ESCAPE '\\') \
///      OR (\"users\".\"email\" LIKE ? ESCAPE '\\'))"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlQuery {
    schema: Arc<Schema>,
    entity: String,
    depth: usize,
    pub(crate) table: String,
    pub(crate) alias: Option<String>,
    pub(crate) join: Option<PivotJoin>,
    pub(crate) projections: Vec<Fragment>,
    pub(crate) clauses: Vec<Clause>,
    pub(crate) orders: Vec<Fragment>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl SqlQuery {
    /// Start a root query over `entity`
    ///
    /// # Errors
    ///
    /// `UnknownEntity` when the schema has no such entity.
    pub fn new(schema: Arc<Schema>, entity: &str) -> Result<Self> {
        let table = schema.entity(entity)?.table.clone();
        Ok(Self {
            schema,
            entity: entity.to_string(),
            depth: 0,
            table,
            alias: None,
            join: None,
            projections: Vec::new(),
            clauses: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Subquery nesting level; 0 for a root query
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Skip the first `count` rows
    pub fn offset(&mut self, count: u64) {
        self.offset = Some(count);
    }

    /// Name the table is referenced by in this query
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    /// SQL text and bindings, rendered in one pass
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut writer = SqlWriter::default();
        writer.query(self);
        writer.finish()
    }

    /// Qualified, quoted reference to a declared column
    fn column(&self, column: &str) -> Result<String> {
        let entity = self.schema.entity(&self.entity)?;
        if !entity.has_column(column) {
            return Err(ScopeError::UnknownAttribute {
                entity: self.entity.clone(),
                attribute: column.to_string(),
            }
            .into());
        }
        Ok(self.qualify(column))
    }

    fn qualify(&self, column: &str) -> String {
        qualify(self.reference(), column)
    }

    /// Empty query sharing this one's entity and table reference
    fn scoped(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            entity: self.entity.clone(),
            depth: self.depth,
            table: self.table.clone(),
            alias: self.alias.clone(),
            join: None,
            projections: Vec::new(),
            clauses: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    fn group<F>(&mut self, connector: Connector, build: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mut group = self.scoped();
        build(&mut group)?;
        if !group.clauses.is_empty() {
            self.clauses.push(Clause {
                connector,
                predicate: Predicate::Group(group.clauses),
            });
        }
        Ok(())
    }
}

fn qualify(reference: &str, column: &str) -> String {
    format!("{}.{}", quote_ident(reference), quote_ident(column))
}

impl QueryBuilder for SqlQuery {
    type Error = ExError;

    fn entity_name(&self) -> &str {
        &self.entity
    }

    fn where_compare(&mut self, column: &str, operator: Operator, value: Value) -> Result<()> {
        let expr = self.column(column)?;
        self.clauses.push(Clause::and(Predicate::Compare {
            expr,
            operator,
            value,
        }));
        Ok(())
    }

    fn where_in(&mut self, column: &str, values: Vec<Value>) -> Result<()> {
        let expr = self.column(column)?;
        self.clauses.push(Clause::and(Predicate::In { expr, values }));
        Ok(())
    }

    fn where_date(&mut self, column: &str, operator: Operator, value: Value) -> Result<()> {
        let expr = format!("date({})", self.column(column)?);
        self.clauses.push(Clause::and(Predicate::Compare {
            expr,
            operator,
            value,
        }));
        Ok(())
    }

    fn where_like(&mut self, column: &str, pattern: String) -> Result<()> {
        let expr = self.column(column)?;
        self.clauses.push(Clause::and(Predicate::Like { expr, pattern }));
        Ok(())
    }

    fn where_group<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.group(Connector::And, build)
    }

    fn or_where_group<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.group(Connector::Or, build)
    }

    fn relation_existence_query(&self, relation: &str) -> Result<Self> {
        let parent = self.schema.entity(&self.entity)?;
        let definition = self.schema.relation(&self.entity, relation)?;
        let related = self.schema.entity(&definition.entity)?;
        let keys = definition
            .join_keys(parent, related)
            .map_err(|reason| entity_validation(&self.entity, &reason).with_path(relation))?;

        let depth = self.depth + 1;
        let mut subquery = Self {
            schema: self.schema.clone(),
            entity: definition.entity.clone(),
            depth,
            table: related.table.clone(),
            alias: Some(format!("{}_{}", related.table, depth)),
            join: None,
            projections: Vec::new(),
            clauses: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        };

        match keys {
            JoinKeys::Direct {
                related_column,
                parent_column,
            } => {
                let left = subquery.qualify(related_column);
                subquery.clauses.push(Clause::and(Predicate::ColumnEq {
                    left,
                    right: self.qualify(parent_column),
                }));
            }
            JoinKeys::Pivot {
                table,
                pivot_parent,
                pivot_related,
                parent_column,
                related_column,
            } => {
                let alias = format!("{}_{}", table, depth);
                let on = format!(
                    "{} = {}",
                    qualify(&alias, pivot_related),
                    subquery.qualify(related_column)
                );
                subquery.clauses.push(Clause::and(Predicate::ColumnEq {
                    left: qualify(&alias, pivot_parent),
                    right: self.qualify(parent_column),
                }));
                subquery.join = Some(PivotJoin {
                    table: table.to_string(),
                    alias,
                    on,
                });
            }
        }

        tracing::trace!(
            component = module_path!(),
            op = "relation_existence_query",
            entity = %self.entity,
            relation,
            kind = definition.kind.as_str(),
            depth,
        );

        Ok(subquery)
    }

    fn where_exists(&mut self, subquery: Self) -> Result<()> {
        self.clauses
            .push(Clause::and(Predicate::Exists(Box::new(subquery))));
        Ok(())
    }

    fn select_column(&mut self, column: &str) -> Result<()> {
        let expr = self.column(column)?;
        self.projections.push(Fragment::plain(expr));
        Ok(())
    }

    fn select_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<()> {
        self.projections.push(Fragment {
            sql: sql.to_string(),
            bindings,
        });
        Ok(())
    }

    fn order_by(&mut self, column: &str, direction: Direction) -> Result<()> {
        let expr = self.column(column)?;
        self.orders
            .push(Fragment::plain(format!("{} {}", expr, direction.as_sql())));
        Ok(())
    }

    fn order_by_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<()> {
        self.orders.push(Fragment {
            sql: sql.to_string(),
            bindings,
        });
        Ok(())
    }

    fn limit(&mut self, count: u64) -> Result<()> {
        self.limit = Some(count);
        Ok(())
    }

    fn to_sql(&self) -> String {
        self.render().0
    }

    fn bindings(&self) -> Vec<Value> {
        self.render().1
    }
}
