//! Query command
//!
//! Usage: relscope query --schema <PATH> --entity <NAME> [filters...] [--db <PATH>]
//!
//! Every filter flag goes through the same conditional helpers a library
//! caller would use, so an empty value (`--search ""`, `--where-in tags.slug=`)
//! adds nothing.

use chrono::NaiveDate;
use clap::Args;
use relscope_core::errors::{ExError, ExErrorKind};
use relscope_core::{
    order, search_any, select_related, when_where, when_where_in, where_date_between, Operator,
    QueryBuilder, Truthy, Value,
};
use relscope_store::{count_rows, db, fetch_rows, parse_schema_file, SqlQuery};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Path to schema YAML file
    #[arg(long)]
    pub schema: PathBuf,

    /// Entity to query
    #[arg(long)]
    pub entity: String,

    /// SQLite database to run against; without it the SQL is printed
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Text to search for in every --search-in path
    #[arg(long, requires = "search_in")]
    pub search: Option<String>,

    /// Attribute path searched by --search (repeatable)
    #[arg(long = "search-in")]
    pub search_in: Vec<String>,

    /// Membership filter `path=v1,v2,...` (repeatable)
    #[arg(long = "where-in", value_name = "PATH=VALUES")]
    pub where_in: Vec<String>,

    /// Comparison filter `field:op:value` (repeatable)
    #[arg(long = "where", value_name = "FIELD:OP:VALUE")]
    pub filters: Vec<String>,

    /// Date column bounded by --from / --to
    #[arg(long)]
    pub date_field: Option<String>,

    /// Inclusive lower date bound (YYYY-MM-DD)
    #[arg(long, requires = "date_field")]
    pub from: Option<String>,

    /// Inclusive upper date bound (YYYY-MM-DD)
    #[arg(long, requires = "date_field")]
    pub to: Option<String>,

    /// Attribute path to order by
    #[arg(long)]
    pub order: Option<String>,

    /// asc or desc; anything else means no ordering
    #[arg(long, default_value = "asc")]
    pub direction: String,

    /// Attribute path to project, optionally `path=alias` (repeatable)
    #[arg(long = "select", value_name = "PATH[=ALIAS]")]
    pub select: Vec<String>,

    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub offset: Option<u64>,

    /// Print the SQL and bindings even when --db is given
    #[arg(long)]
    pub sql: bool,

    /// Print the number of matching rows instead of the rows
    #[arg(long, conflicts_with = "sql")]
    pub count: bool,
}

/// A filter value typed on the command line
///
/// Present by construction: `--where flag:=:false` filters on `false`
/// rather than being skipped the way an absent value would.
#[derive(Debug)]
struct Given(Value);

impl Truthy for Given {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl From<Given> for Value {
    fn from(given: Given) -> Self {
        given.0
    }
}

/// Execute query command
pub fn execute(args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(parse_schema_file(&args.schema)?);
    let mut query = SqlQuery::new(schema, &args.entity)?;

    compose(&mut query, &args)?;

    match &args.db {
        Some(path) if !args.sql => {
            let conn = db::open_read_only(path)?;
            if args.count {
                println!("{}", count_rows(&conn, &query)?);
            } else {
                for row in fetch_rows(&conn, &query)? {
                    println!("{}", serde_json::to_string(&row)?);
                }
            }
        }
        _ => {
            let (sql, bindings) = query.render();
            println!("{}", sql);
            println!("{}", serde_json::to_string(&bindings)?);
        }
    }

    Ok(())
}

fn compose(query: &mut SqlQuery, args: &QueryArgs) -> Result<(), ExError> {
    if let Some(text) = &args.search {
        search_any(query, &args.search_in, text)?;
    }

    for raw in &args.where_in {
        let (path, values) = parse_membership(raw)?;
        when_where_in(query, path, values)?;
    }

    for raw in &args.filters {
        let (field, operator, value) = parse_comparison(raw)?;
        when_where(query, field, operator, value)?;
    }

    if let Some(field) = &args.date_field {
        let from = parse_date(args.from.as_deref())?;
        let to = parse_date(args.to.as_deref())?;
        where_date_between(query, field, from, to)?;
    }

    for raw in &args.select {
        let (path, alias) = match raw.split_once('=') {
            Some((path, alias)) => (path, Some(alias)),
            None => (raw.as_str(), None),
        };
        select_related(query, path, alias)?;
    }

    if let Some(path) = &args.order {
        order(query, path, &args.direction)?;
    }

    if let Some(limit) = args.limit {
        query.limit(limit)?;
    }
    if let Some(offset) = args.offset {
        query.offset(offset);
    }

    Ok(())
}

/// `path=v1,v2` into the path and its inferred values
fn parse_membership(raw: &str) -> Result<(&str, Vec<Value>), ExError> {
    let (path, values) = raw
        .split_once('=')
        .ok_or_else(|| invalid_input(format!("expected PATH=VALUES, got '{}'", raw)))?;
    let values = values
        .split(',')
        .filter(|v| !v.is_empty())
        .map(Value::infer)
        .collect();
    Ok((path, values))
}

/// `field:op:value`; an empty value yields `None`
fn parse_comparison(raw: &str) -> Result<(&str, Operator, Option<Given>), ExError> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(operator), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid_input(format!(
            "expected FIELD:OP:VALUE, got '{}'",
            raw
        )));
    };
    let operator: Operator = operator.parse()?;
    let value = (!value.is_empty()).then(|| Given(Value::infer(value)));
    Ok((field, operator, value))
}

fn parse_date(bound: Option<&str>) -> Result<Option<NaiveDate>, ExError> {
    bound
        .filter(|b| !b.is_empty())
        .map(|b| {
            NaiveDate::parse_from_str(b, "%Y-%m-%d")
                .map_err(|e| invalid_input(format!("invalid date '{}': {}", b, e)))
        })
        .transpose()
}

fn invalid_input(message: String) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("query_args")
        .with_message(message)
}
