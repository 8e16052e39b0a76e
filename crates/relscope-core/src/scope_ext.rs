//! Method-call sugar over the composition functions
//!
//! ```ignore
//! query
//!     .search_any(&["title", "author.name"], term)?
//!     .when_where_in("tags.slug", slugs)?
//!     .order("author.profile.rank", "desc")?;
//! ```

use crate::builder::QueryBuilder;
use crate::operator::Operator;
use crate::value::{Truthy, Value};
use crate::{predicate, projection, search};

/// Chaining form of the free functions in this crate
///
/// Implemented for every [`QueryBuilder`]; each method delegates to the
/// function of the same name and returns the query for further chaining.
pub trait ScopeExt: QueryBuilder {
    fn when_where<V>(
        &mut self,
        field: &str,
        operator: Operator,
        value: V,
    ) -> Result<&mut Self, Self::Error>
    where
        V: Truthy + Into<Value>,
    {
        predicate::when_where(self, field, operator, value)?;
        Ok(self)
    }

    fn when_where_in<V: Into<Value>>(
        &mut self,
        path: &str,
        values: Vec<V>,
    ) -> Result<&mut Self, Self::Error> {
        predicate::when_where_in(self, path, values)?;
        Ok(self)
    }

    fn where_date_between<F, T>(
        &mut self,
        attribute: &str,
        from: F,
        to: T,
    ) -> Result<&mut Self, Self::Error>
    where
        F: Truthy + Into<Value>,
        T: Truthy + Into<Value>,
    {
        predicate::where_date_between(self, attribute, from, to)?;
        Ok(self)
    }

    fn search(&mut self, path: &str, text: &str) -> Result<&mut Self, Self::Error> {
        predicate::search(self, path, text)?;
        Ok(self)
    }

    fn search_any<P: AsRef<str>>(
        &mut self,
        paths: &[P],
        text: &str,
    ) -> Result<&mut Self, Self::Error> {
        search::search_any(self, paths, text)?;
        Ok(self)
    }

    fn select_related(&mut self, path: &str, alias: Option<&str>) -> Result<&mut Self, Self::Error> {
        projection::select_related(self, path, alias)?;
        Ok(self)
    }

    fn order(&mut self, path: &str, direction: &str) -> Result<&mut Self, Self::Error> {
        projection::order(self, path, direction)?;
        Ok(self)
    }
}

impl<Q: QueryBuilder> ScopeExt for Q {}
