//! Schema format v1
//!
//! ```yaml
//! schema_version: 1
//! entities:
//!   users:
//!     table: users
//!     columns: [id, name]
//!     relations:
//!       posts: { kind: has_many, entity: posts, foreign_key: author_id }
//!   posts:
//!     table: posts
//!     relations:
//!       author: { kind: belongs_to, entity: users, foreign_key: author_id }
//!       tags:
//!         kind: belongs_to_many
//!         entity: tags
//!         pivot: post_tag
//!         foreign_pivot_key: post_id
//!         related_pivot_key: tag_id
//!   tags:
//!     table: tags
//! ```

use relscope_core::ScopeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level schema file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Format version (must be 1)
    pub schema_version: u32,

    /// Entities keyed by the name queries refer to them by
    pub entities: BTreeMap<String, EntityDef>,
}

/// One entity and the table behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDef {
    /// Backing table
    pub table: String,

    /// Primary key column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Columns that may be referenced; any column when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Named relationships to other entities
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, RelationDef>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// How a relationship is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Parent holds `foreign_key` pointing at the related entity's `owner_key`
    BelongsTo,
    /// Related entity holds `foreign_key` pointing at the parent's `local_key`
    HasOne,
    /// As `HasOne`, with any number of related rows
    HasMany,
    /// Linked through a pivot table
    BelongsToMany,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::BelongsToMany => "belongs_to_many",
        }
    }
}

/// A named relationship
///
/// Which key fields apply depends on `kind`; optional keys default to the
/// primary key of the entity they live on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDef {
    pub kind: RelationKind,

    /// Related entity name
    pub entity: String,

    /// `belongs_to`: column on the parent; `has_one`/`has_many`: column on
    /// the related entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    /// `belongs_to`: referenced column on the related entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_key: Option<String>,

    /// `has_one`/`has_many`: referenced column on the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_key: Option<String>,

    /// `belongs_to_many`: pivot table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<String>,

    /// `belongs_to_many`: pivot column referencing the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_pivot_key: Option<String>,

    /// `belongs_to_many`: pivot column referencing the related entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_pivot_key: Option<String>,

    /// `belongs_to_many`: parent column the pivot references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,

    /// `belongs_to_many`: related column the pivot references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_key: Option<String>,
}

impl Schema {
    /// Look up an entity by name
    ///
    /// # Errors
    ///
    /// `UnknownEntity` when the schema has no such entity.
    pub fn entity(&self, name: &str) -> Result<&EntityDef, ScopeError> {
        self.entities
            .get(name)
            .ok_or_else(|| ScopeError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    /// Look up a relationship declared on `entity`
    ///
    /// # Errors
    ///
    /// `UnknownEntity` or `UnknownRelationship`.
    pub fn relation(&self, entity: &str, relation: &str) -> Result<&RelationDef, ScopeError> {
        self.entity(entity)?
            .relations
            .get(relation)
            .ok_or_else(|| ScopeError::UnknownRelationship {
                entity: entity.to_string(),
                relation: relation.to_string(),
            })
    }
}

impl EntityDef {
    /// True when `column` may be referenced on this entity
    pub fn has_column(&self, column: &str) -> bool {
        match &self.columns {
            Some(columns) => columns.iter().any(|c| c == column),
            None => true,
        }
    }
}

/// Join columns of a relationship, with defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKeys<'a> {
    /// `related.related_column = parent.parent_column`
    Direct {
        related_column: &'a str,
        parent_column: &'a str,
    },
    /// `pivot.pivot_related = related.related_column`, correlated by
    /// `pivot.pivot_parent = parent.parent_column`
    Pivot {
        table: &'a str,
        pivot_parent: &'a str,
        pivot_related: &'a str,
        parent_column: &'a str,
        related_column: &'a str,
    },
}

impl RelationDef {
    /// Resolve the join columns between `parent` and `related`
    ///
    /// # Errors
    ///
    /// Names the key field `kind` requires but the definition lacks.
    pub fn join_keys<'a>(
        &'a self,
        parent: &'a EntityDef,
        related: &'a EntityDef,
    ) -> Result<JoinKeys<'a>, String> {
        let require = |value: &'a Option<String>, field: &str| {
            value
                .as_deref()
                .ok_or_else(|| format!("{} relation requires `{}`", self.kind.as_str(), field))
        };

        match self.kind {
            RelationKind::BelongsTo => Ok(JoinKeys::Direct {
                related_column: self.owner_key.as_deref().unwrap_or(&related.primary_key),
                parent_column: require(&self.foreign_key, "foreign_key")?,
            }),
            RelationKind::HasOne | RelationKind::HasMany => Ok(JoinKeys::Direct {
                related_column: require(&self.foreign_key, "foreign_key")?,
                parent_column: self.local_key.as_deref().unwrap_or(&parent.primary_key),
            }),
            RelationKind::BelongsToMany => Ok(JoinKeys::Pivot {
                table: require(&self.pivot, "pivot")?,
                pivot_parent: require(&self.foreign_pivot_key, "foreign_pivot_key")?,
                pivot_related: require(&self.related_pivot_key, "related_pivot_key")?,
                parent_column: self.parent_key.as_deref().unwrap_or(&parent.primary_key),
                related_column: self.related_key.as_deref().unwrap_or(&related.primary_key),
            }),
        }
    }
}
