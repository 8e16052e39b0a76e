//! Single-pass SQL rendering
//!
//! SQL text and bindings are produced together, so the order of the
//! bindings is always the order of the `?` placeholders.

use crate::query::clause::{Clause, Predicate};
use crate::query::{Fragment, SqlQuery};
use relscope_core::builder::quote_ident;
use relscope_core::{Operator, Value};

#[derive(Debug, Default)]
pub struct SqlWriter {
    sql: String,
    bindings: Vec<Value>,
}

impl SqlWriter {
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.bindings)
    }

    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn bind(&mut self, value: Value) {
        self.sql.push('?');
        self.bindings.push(value);
    }

    fn fragment(&mut self, fragment: &Fragment) {
        self.push(&fragment.sql);
        self.bindings.extend(fragment.bindings.iter().cloned());
    }

    pub fn query(&mut self, query: &SqlQuery) {
        self.push("SELECT ");
        if query.projections.is_empty() {
            self.push(&quote_ident(query.reference()));
            self.push(".*");
        } else {
            for (i, projection) in query.projections.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fragment(projection);
            }
        }

        self.push(" FROM ");
        self.push(&quote_ident(&query.table));
        if let Some(alias) = &query.alias {
            self.push(" AS ");
            self.push(&quote_ident(alias));
        }

        if let Some(join) = &query.join {
            self.push(" INNER JOIN ");
            self.push(&quote_ident(&join.table));
            self.push(" AS ");
            self.push(&quote_ident(&join.alias));
            self.push(" ON ");
            self.push(&join.on);
        }

        if !query.clauses.is_empty() {
            self.push(" WHERE ");
            self.clauses(&query.clauses);
        }

        if !query.orders.is_empty() {
            self.push(" ORDER BY ");
            for (i, order) in query.orders.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.fragment(order);
            }
        }

        match (query.limit, query.offset) {
            (Some(limit), offset) => {
                self.push(" LIMIT ");
                self.bind(count_value(limit));
                if let Some(offset) = offset {
                    self.push(" OFFSET ");
                    self.bind(count_value(offset));
                }
            }
            (None, Some(offset)) => {
                // SQLite only accepts OFFSET after a LIMIT
                self.push(" LIMIT -1 OFFSET ");
                self.bind(count_value(offset));
            }
            (None, None) => {}
        }
    }

    fn clauses(&mut self, clauses: &[Clause]) {
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                self.push(" ");
                self.push(clause.connector.as_sql());
                self.push(" ");
            }
            self.predicate(&clause.predicate);
        }
    }

    fn predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Compare {
                expr,
                operator,
                value,
            } => {
                self.push(expr);
                self.push(" ");
                self.push(operator.as_sql());
                self.push(" ");
                self.bind(value.clone());
                if matches!(operator, Operator::Like | Operator::NotLike) {
                    self.push(" ESCAPE '\\'");
                }
            }
            Predicate::In { expr, values } => {
                if values.is_empty() {
                    self.push("0 = 1");
                    return;
                }
                self.push(expr);
                self.push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.bind(value.clone());
                }
                self.push(")");
            }
            Predicate::Like { expr, pattern } => {
                self.push(expr);
                self.push(" LIKE ");
                self.bind(Value::Text(pattern.clone()));
                self.push(" ESCAPE '\\'");
            }
            Predicate::ColumnEq { left, right } => {
                self.push(left);
                self.push(" = ");
                self.push(right);
            }
            Predicate::Group(clauses) => {
                self.push("(");
                self.clauses(clauses);
                self.push(")");
            }
            Predicate::Exists(subquery) => {
                self.push("EXISTS (");
                self.query(subquery);
                self.push(")");
            }
        }
    }
}

fn count_value(count: u64) -> Value {
    Value::Integer(i64::try_from(count).unwrap_or(i64::MAX))
}
