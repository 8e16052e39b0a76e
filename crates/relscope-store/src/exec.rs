//! Execution of composed queries against SQLite

use crate::errors::{from_rusqlite, Result};
use crate::query::SqlQuery;
use relscope_core::{log_op_end, log_op_error, log_op_start, QueryBuilder, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::time::Instant;

/// One result row, columns in SELECT order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in SELECT order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Run `query` and collect every row
///
/// # Errors
///
/// `Persistence` when SQLite rejects the statement (missing table or
/// column, type errors).
pub fn fetch_rows(conn: &Connection, query: &SqlQuery) -> Result<Vec<Row>> {
    log_op_start!("fetch_rows", entity = query.entity_name());
    let start = Instant::now();

    let (sql, bindings) = query.render();
    let rows = run(conn, &sql, &bindings).map_err(|e| {
        log_op_error!(
            "fetch_rows",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "fetch_rows",
        duration_ms = start.elapsed().as_millis() as u64,
        row_count = rows.len()
    );

    Ok(rows)
}

/// Number of rows `query` matches
///
/// LIMIT and OFFSET on `query` apply to the count as well.
///
/// # Errors
///
/// As for [`fetch_rows`].
pub fn count_rows(conn: &Connection, query: &SqlQuery) -> Result<u64> {
    log_op_start!("count_rows", entity = query.entity_name());
    let start = Instant::now();

    let (sql, bindings) = query.render();
    let sql = format!("SELECT COUNT(*) FROM ({})", sql);
    let count = count(conn, &sql, &bindings).map_err(|e| {
        log_op_error!(
            "count_rows",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "count_rows",
        duration_ms = start.elapsed().as_millis() as u64,
        row_count = count
    );

    Ok(count)
}

fn run(conn: &Connection, sql: &str, bindings: &[Value]) -> Result<Vec<Row>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| from_rusqlite(e).with_op("fetch_rows"))?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt
        .query(params_from_iter(bindings.iter().map(to_sql_value)))
        .map_err(from_rusqlite)?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        let mut columns = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let value = row.get_ref(i).map_err(from_rusqlite)?;
            columns.push((name.clone(), from_value_ref(value)));
        }
        out.push(Row { columns });
    }
    Ok(out)
}

fn count(conn: &Connection, sql: &str, bindings: &[Value]) -> Result<u64> {
    let count: i64 = conn
        .query_row(sql, params_from_iter(bindings.iter().map(to_sql_value)), |row| {
            row.get(0)
        })
        .map_err(|e| from_rusqlite(e).with_op("count_rows"))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
