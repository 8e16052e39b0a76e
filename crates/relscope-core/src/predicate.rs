//! Conditional predicates, with relationship traversal for membership and
//! substring search
//!
//! Each operation is guarded by [`when`]: an absent driving value leaves the
//! query untouched. For the traversing operations a path `a.b.c` opens one
//! existence subquery per non-terminal segment (`a`, then `b`) and applies
//! the predicate to `c` on the innermost related entity.

use crate::builder::QueryBuilder;
use crate::conditional::when;
use crate::errors::ScopeError;
use crate::operator::Operator;
use crate::path::AttributePath;
use crate::value::{Truthy, Value};
use relscope_core_types::Redacted;

/// Apply `field <operator> value` when `value` is present
///
/// `field` must name an attribute of the current entity; traversal through
/// relationships is not supported here.
///
/// # Errors
///
/// `EmptySegment` / `MalformedPath` for an invalid or dotted field, plus
/// whatever the builder reports for the column.
pub fn when_where<Q, V>(
    query: &mut Q,
    field: &str,
    operator: Operator,
    value: V,
) -> Result<(), Q::Error>
where
    Q: QueryBuilder,
    V: Truthy + Into<Value>,
{
    when(query, value, |q, value| {
        let field = terminal_attribute(field)?;
        q.where_compare(field, operator, value.into())
    })
}

/// Apply `path IN values` when `values` is non-empty, traversing relationships
///
/// # Errors
///
/// `EmptySegment` for a malformed path, the builder's unknown-relationship
/// error for a segment that is not a relationship.
pub fn when_where_in<Q, V>(query: &mut Q, path: &str, values: Vec<V>) -> Result<(), Q::Error>
where
    Q: QueryBuilder,
    V: Into<Value>,
{
    when(query, values, |q, values| {
        let path = AttributePath::parse(path)?;
        tracing::debug!(
            component = module_path!(),
            op = "when_where_in",
            entity = q.entity_name(),
            path = path.as_str(),
            depth = path.depth(),
            values = values.len(),
        );
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        where_in_path(q, path, values)
    })
}

fn where_in_path<Q: QueryBuilder>(
    query: &mut Q,
    path: AttributePath<'_>,
    values: Vec<Value>,
) -> Result<(), Q::Error> {
    match path.split() {
        (relation, Some(rest)) => {
            tracing::trace!(component = module_path!(), op = "when_where_in", relation);
            query.where_has(relation, |subquery| where_in_path(subquery, rest, values))
        }
        (attribute, None) => query.where_in(attribute, values),
    }
}

/// Apply `path LIKE %text%` when `text` is non-empty, traversing relationships
///
/// `%`, `_` and `\` in `text` match literally.
///
/// # Errors
///
/// `EmptySegment` for a malformed path, the builder's unknown-relationship
/// error for a segment that is not a relationship.
pub fn search<Q: QueryBuilder>(query: &mut Q, path: &str, text: &str) -> Result<(), Q::Error> {
    when(query, text, |q, text| {
        let path = AttributePath::parse(path)?;
        tracing::debug!(
            component = module_path!(),
            op = "search",
            entity = q.entity_name(),
            path = path.as_str(),
            depth = path.depth(),
            text = %Redacted::new(text),
        );
        search_path(q, path, &like_pattern(text))
    })
}

fn search_path<Q: QueryBuilder>(
    query: &mut Q,
    path: AttributePath<'_>,
    pattern: &str,
) -> Result<(), Q::Error> {
    match path.split() {
        (relation, Some(rest)) => {
            tracing::trace!(component = module_path!(), op = "search", relation);
            query.where_has(relation, |subquery| search_path(subquery, rest, pattern))
        }
        (attribute, None) => query.where_like(attribute, pattern.to_string()),
    }
}

/// Wrap `text` in `%` wildcards, escaping LIKE metacharacters with `\`
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Bound `date(attribute)` by `from` and/or `to`
///
/// The bounds are independent: each is applied only when present, so
/// passing neither leaves the query untouched.
///
/// # Errors
///
/// `EmptySegment` / `MalformedPath` for an invalid or dotted attribute.
pub fn where_date_between<Q, F, T>(
    query: &mut Q,
    attribute: &str,
    from: F,
    to: T,
) -> Result<(), Q::Error>
where
    Q: QueryBuilder,
    F: Truthy + Into<Value>,
    T: Truthy + Into<Value>,
{
    when(query, from, |q, from| {
        let attribute = terminal_attribute(attribute)?;
        q.where_date(attribute, Operator::Gte, from.into())
    })?;
    when(query, to, |q, to| {
        let attribute = terminal_attribute(attribute)?;
        q.where_date(attribute, Operator::Lte, to.into())
    })
}

fn terminal_attribute(field: &str) -> Result<&str, ScopeError> {
    let path = AttributePath::parse(field)?;
    if !path.is_terminal() {
        return Err(ScopeError::MalformedPath {
            path: field.to_string(),
            reason: "relationship traversal is not supported for this predicate".to_string(),
        });
    }
    Ok(path.as_str())
}
