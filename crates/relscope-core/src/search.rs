//! Multi-attribute search

use crate::builder::QueryBuilder;
use crate::conditional::when;
use crate::predicate::search;
use relscope_core_types::Redacted;

/// Match `text` against any of `paths`
///
/// Builds one parenthesised group in which every path contributes a
/// substring search (traversing relationships as needed) joined with OR:
///
/// ```text
/// ... AND ((name LIKE ?) OR (EXISTS (... bio LIKE ?)))
/// ```
///
/// The group is atomic, so it composes with other AND-combined predicates
/// without leaking its OR into the outer conjunction. An empty `text` adds
/// nothing; an empty `paths` list adds nothing either (never a full-table
/// match).
///
/// # Errors
///
/// The first error raised by any path's search.
pub fn search_any<Q, P>(query: &mut Q, paths: &[P], text: &str) -> Result<(), Q::Error>
where
    Q: QueryBuilder,
    P: AsRef<str>,
{
    when(query, text, |q, text| {
        tracing::debug!(
            component = module_path!(),
            op = "search_any",
            entity = q.entity_name(),
            paths = paths.len(),
            text = %Redacted::new(text),
        );
        q.where_group(|group| {
            for path in paths {
                group.or_where_group(|disjunct| search(disjunct, path.as_ref(), text))?;
            }
            Ok(())
        })
    })
}
