//! Projection and ordering through relationship chains
//!
//! A path `author.profile.rank` is turned into a chain of correlated scalar
//! subqueries: the outer one ranges over `author` and selects the scalar
//! result of an inner one ranging over `profile`, which selects `rank`.
//! For a path of depth *k* this yields *k − 1* nested subqueries.

use crate::builder::QueryBuilder;
use crate::conditional::when;
use crate::errors::ScopeError;
use crate::operator::Direction;
use crate::path::AttributePath;

/// Build the correlated scalar subquery addressed by `path`
///
/// The returned query ranges over the entity reached by the first segment,
/// is correlated to `query`, selects the value of the last segment and is
/// limited to one row so it can be used wherever a scalar is expected.
/// `query` itself is not modified.
///
/// # Errors
///
/// - `MalformedPath` when `path` has a single segment
/// - `EmptySegment` for an empty path or segment
/// - the builder's unknown-relationship error for a bad relation segment
pub fn nested_select<Q: QueryBuilder>(query: &Q, path: &str) -> Result<Q, Q::Error> {
    let parsed = AttributePath::parse(path)?;
    tracing::debug!(
        component = module_path!(),
        op = "nested_select",
        entity = query.entity_name(),
        path,
        depth = parsed.depth(),
    );
    nested_select_path(query, parsed)
}

fn nested_select_path<Q: QueryBuilder>(query: &Q, path: AttributePath<'_>) -> Result<Q, Q::Error> {
    let (relation, rest) = path.split();
    let rest = rest.ok_or_else(|| ScopeError::MalformedPath {
        path: path.to_string(),
        reason: "expected `relation.attribute`".to_string(),
    })?;

    let mut subquery = query.relation_existence_query(relation)?;

    if rest.is_terminal() {
        subquery.select_column(rest.as_str())?;
    } else {
        let inner = nested_select_path(&subquery, rest)?;
        subquery.select_raw(&format!("({})", inner.to_sql()), inner.bindings())?;
    }
    subquery.limit(1)?;

    Ok(subquery)
}

/// Add the value addressed by `path` to the query's projection
///
/// A dot-free path selects the column directly. Otherwise the
/// [`nested_select`] subquery is projected under `alias`, defaulting to the
/// path with dots replaced by underscores (`author_profile_rank`).
///
/// # Errors
///
/// As for [`nested_select`].
pub fn select_related<Q: QueryBuilder>(
    query: &mut Q,
    path: &str,
    alias: Option<&str>,
) -> Result<(), Q::Error> {
    let parsed = AttributePath::parse(path)?;
    if parsed.is_terminal() {
        return query.select_column(path);
    }

    let subquery = nested_select_path(query, parsed)?;
    let alias = alias
        .map(str::to_string)
        .unwrap_or_else(|| path.replace('.', "_"));
    query.select_raw_as(
        &format!("({})", subquery.to_sql()),
        subquery.bindings(),
        &alias,
    )
}

/// Order by the value addressed by `path`
///
/// Applied only when `path` is non-empty and `direction` is `asc` or `desc`
/// (any case); any other direction token means "no ordering requested".
///
/// # Errors
///
/// As for [`nested_select`] when `path` has more than one segment.
pub fn order<Q: QueryBuilder>(query: &mut Q, path: &str, direction: &str) -> Result<(), Q::Error> {
    let Some(direction) = Direction::parse(direction) else {
        return Ok(());
    };
    when(query, path, |q, path| order_by_path(q, path, direction))
}

/// Order by the value addressed by `path` in an already-parsed direction
///
/// # Errors
///
/// As for [`nested_select`] when `path` has more than one segment.
pub fn order_by_path<Q: QueryBuilder>(
    query: &mut Q,
    path: &str,
    direction: Direction,
) -> Result<(), Q::Error> {
    let parsed = AttributePath::parse(path)?;
    tracing::debug!(
        component = module_path!(),
        op = "order",
        entity = query.entity_name(),
        path,
        direction = direction.as_sql(),
    );

    if parsed.is_terminal() {
        return query.order_by(path, direction);
    }

    let subquery = nested_select_path(query, parsed)?;
    query.order_by_raw(
        &format!("({}) {}", subquery.to_sql(), direction.as_sql()),
        subquery.bindings(),
    )
}
