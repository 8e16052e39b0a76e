//! WHERE clause tree

use crate::query::SqlQuery;
use relscope_core::{Operator, Value};

/// Boolean connector joining a clause to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// One predicate with its connector
#[derive(Debug, Clone)]
pub struct Clause {
    pub connector: Connector,
    pub predicate: Predicate,
}

impl Clause {
    pub fn and(predicate: Predicate) -> Self {
        Self {
            connector: Connector::And,
            predicate,
        }
    }
}

/// Column expressions are already qualified and quoted when stored
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `expr <op> ?`
    Compare {
        expr: String,
        operator: Operator,
        value: Value,
    },
    /// `expr IN (?, ...)`; an empty list matches nothing
    In { expr: String, values: Vec<Value> },
    /// `expr LIKE ? ESCAPE '\'`
    Like { expr: String, pattern: String },
    /// `left = right` between two columns, used for correlation
    ColumnEq { left: String, right: String },
    /// Parenthesised sub-expression
    Group(Vec<Clause>),
    /// `EXISTS (subquery)`
    Exists(Box<SqlQuery>),
}
