//! Recording query builder used to exercise the composition helpers without
//! a database.
//!
//! Renders a compact pseudo-SQL so assertions can look at the exact shape of
//! what was composed, and counts how many existence subqueries were opened.

use relscope_core::{Direction, Operator, QueryBuilder, ScopeError, Value};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// entity -> (relation -> related entity)
type Relations = HashMap<&'static str, HashMap<&'static str, &'static str>>;

fn blog_relations() -> Relations {
    let mut relations: Relations = HashMap::new();
    relations.insert(
        "users",
        HashMap::from([("profile", "profiles"), ("posts", "posts")]),
    );
    relations.insert("profiles", HashMap::from([("user", "users")]));
    relations.insert(
        "posts",
        HashMap::from([
            ("author", "users"),
            ("comments", "comments"),
            ("tags", "tags"),
        ]),
    );
    relations.insert("comments", HashMap::from([("author", "users")]));
    relations.insert("tags", HashMap::new());
    relations
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Connector {
    And,
    Or,
}

#[derive(Debug, Clone)]
struct Fragment {
    connector: Connector,
    sql: String,
    bindings: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct RecordingQuery {
    relations: Rc<Relations>,
    entity: String,
    via: Option<String>,
    selects: Vec<Fragment>,
    wheres: Vec<Fragment>,
    orders: Vec<Fragment>,
    limit: Option<u64>,
    opened: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl RecordingQuery {
    /// Root query over `entity` in the blog schema
    pub fn blog(entity: &str) -> Self {
        Self {
            relations: Rc::new(blog_relations()),
            entity: entity.to_string(),
            via: None,
            selects: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            opened: Rc::new(Cell::new(0)),
        }
    }

    /// Number of existence subqueries opened through this query tree
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// Number of top-level WHERE fragments
    pub fn where_count(&self) -> usize {
        self.wheres.len()
    }

    /// Number of ORDER BY fragments
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    fn scoped(&self) -> Self {
        Self {
            relations: self.relations.clone(),
            entity: self.entity.clone(),
            via: self.via.clone(),
            selects: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            opened: self.opened.clone(),
        }
    }

    fn push_where(&mut self, connector: Connector, sql: String, bindings: Vec<Value>) {
        self.wheres.push(Fragment {
            connector,
            sql,
            bindings,
        });
    }

    fn render_wheres(&self) -> String {
        let mut out = String::new();
        for (i, fragment) in self.wheres.iter().enumerate() {
            if i > 0 {
                out.push_str(match fragment.connector {
                    Connector::And => " AND ",
                    Connector::Or => " OR ",
                });
            }
            out.push_str(&fragment.sql);
        }
        out
    }

    fn where_bindings(&self) -> Vec<Value> {
        self.wheres
            .iter()
            .flat_map(|f| f.bindings.iter().cloned())
            .collect()
    }

    fn group<F>(&mut self, connector: Connector, build: F) -> Result<(), ScopeError>
    where
        F: FnOnce(&mut Self) -> Result<(), ScopeError>,
    {
        let mut group = self.scoped();
        build(&mut group)?;
        if !group.wheres.is_empty() {
            let sql = format!("({})", group.render_wheres());
            let bindings = group.where_bindings();
            self.push_where(connector, sql, bindings);
        }
        Ok(())
    }
}

impl QueryBuilder for RecordingQuery {
    type Error = ScopeError;

    fn entity_name(&self) -> &str {
        &self.entity
    }

    fn where_compare(
        &mut self,
        column: &str,
        operator: Operator,
        value: Value,
    ) -> Result<(), ScopeError> {
        self.push_where(
            Connector::And,
            format!("{} {} ?", column, operator.as_sql()),
            vec![value],
        );
        Ok(())
    }

    fn where_in(&mut self, column: &str, values: Vec<Value>) -> Result<(), ScopeError> {
        let placeholders = vec!["?"; values.len()].join(", ");
        self.push_where(
            Connector::And,
            format!("{} IN ({})", column, placeholders),
            values,
        );
        Ok(())
    }

    fn where_date(
        &mut self,
        column: &str,
        operator: Operator,
        value: Value,
    ) -> Result<(), ScopeError> {
        self.push_where(
            Connector::And,
            format!("date({}) {} ?", column, operator.as_sql()),
            vec![value],
        );
        Ok(())
    }

    fn where_like(&mut self, column: &str, pattern: String) -> Result<(), ScopeError> {
        self.push_where(
            Connector::And,
            format!("{} LIKE ?", column),
            vec![Value::Text(pattern)],
        );
        Ok(())
    }

    fn where_group<F>(&mut self, build: F) -> Result<(), ScopeError>
    where
        F: FnOnce(&mut Self) -> Result<(), ScopeError>,
    {
        self.group(Connector::And, build)
    }

    fn or_where_group<F>(&mut self, build: F) -> Result<(), ScopeError>
    where
        F: FnOnce(&mut Self) -> Result<(), ScopeError>,
    {
        self.group(Connector::Or, build)
    }

    fn relation_existence_query(&self, relation: &str) -> Result<Self, ScopeError> {
        let related = self
            .relations
            .get(self.entity.as_str())
            .and_then(|r| r.get(relation))
            .ok_or_else(|| ScopeError::UnknownRelationship {
                entity: self.entity.clone(),
                relation: relation.to_string(),
            })?;

        self.opened.set(self.opened.get() + 1);

        let mut subquery = self.scoped();
        subquery.entity = related.to_string();
        subquery.via = Some(relation.to_string());
        Ok(subquery)
    }

    fn where_exists(&mut self, subquery: Self) -> Result<(), ScopeError> {
        let sql = format!("EXISTS ({})", subquery.to_sql());
        let bindings = subquery.bindings();
        self.push_where(Connector::And, sql, bindings);
        Ok(())
    }

    fn select_column(&mut self, column: &str) -> Result<(), ScopeError> {
        self.selects.push(Fragment {
            connector: Connector::And,
            sql: column.to_string(),
            bindings: Vec::new(),
        });
        Ok(())
    }

    fn select_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<(), ScopeError> {
        self.selects.push(Fragment {
            connector: Connector::And,
            sql: sql.to_string(),
            bindings,
        });
        Ok(())
    }

    fn order_by(&mut self, column: &str, direction: Direction) -> Result<(), ScopeError> {
        self.orders.push(Fragment {
            connector: Connector::And,
            sql: format!("{} {}", column, direction.as_sql()),
            bindings: Vec::new(),
        });
        Ok(())
    }

    fn order_by_raw(&mut self, sql: &str, bindings: Vec<Value>) -> Result<(), ScopeError> {
        self.orders.push(Fragment {
            connector: Connector::And,
            sql: sql.to_string(),
            bindings,
        });
        Ok(())
    }

    fn limit(&mut self, count: u64) -> Result<(), ScopeError> {
        self.limit = Some(count);
        Ok(())
    }

    fn to_sql(&self) -> String {
        let columns = if self.selects.is_empty() {
            "*".to_string()
        } else {
            self.selects
                .iter()
                .map(|f| f.sql.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, self.entity);
        if let Some(via) = &self.via {
            sql.push_str(&format!(" VIA {}", via));
        }
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.render_wheres());
        }
        if !self.orders.is_empty() {
            let orders: Vec<&str> = self.orders.iter().map(|f| f.sql.as_str()).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        sql
    }

    fn bindings(&self) -> Vec<Value> {
        self.selects
            .iter()
            .flat_map(|f| f.bindings.iter().cloned())
            .chain(self.where_bindings())
            .chain(self.orders.iter().flat_map(|f| f.bindings.iter().cloned()))
            .collect()
    }
}

/// Shorthand for a text binding
#[allow(dead_code)]
pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}
