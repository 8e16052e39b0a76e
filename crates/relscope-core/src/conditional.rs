//! Conditional application of query transformations

use crate::value::Truthy;

/// Apply `apply` to `query` only when `value` is truthy
///
/// An absent driving value is a no-op: the query is left exactly as it was,
/// no clause is added and `apply` is never called. Errors returned by
/// `apply` propagate unchanged.
///
/// # Example
///
/// ```
/// use relscope_core::conditional::when;
///
/// let mut clauses: Vec<String> = Vec::new();
/// when(&mut clauses, "", |q, v: &str| -> Result<(), ()> {
///     q.push(v.to_string());
///     Ok(())
/// })
/// .unwrap();
/// assert!(clauses.is_empty());
/// ```
pub fn when<Q, V, E, F>(query: &mut Q, value: V, apply: F) -> Result<(), E>
where
    Q: ?Sized,
    V: Truthy,
    F: FnOnce(&mut Q, V) -> Result<(), E>,
{
    if value.is_truthy() {
        apply(query, value)
    } else {
        tracing::trace!(component = module_path!(), op = "when", "driving value absent");
        Ok(())
    }
}
