#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures_dir;
use relscope_core::ExErrorKind;
use relscope_store::{parse_schema_file, parse_schema_str, RelationKind};

#[test]
fn test_parse_blog_schema() {
    // Given: the blog fixture
    let path = fixtures_dir().join("blog_schema.yaml");

    // When: we parse it
    let result = parse_schema_file(&path);

    // Then: every entity and relation is present
    assert!(result.is_ok(), "Should parse blog schema: {:?}", result.err());
    let schema = result.unwrap();
    assert_eq!(schema.entities.len(), 5);

    let tags = schema.relation("posts", "tags").unwrap();
    assert_eq!(tags.kind, RelationKind::BelongsToMany);
    assert_eq!(tags.pivot.as_deref(), Some("post_tag"));

    let manager = schema.relation("users", "manager").unwrap();
    assert_eq!(manager.kind, RelationKind::BelongsTo);
    assert_eq!(manager.entity, "users");
}

#[test]
fn test_unknown_relation_target_rejected() {
    let path = fixtures_dir().join("schema_unknown_target.yaml");

    let err = parse_schema_file(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::SchemaInvalid);
    assert_eq!(err.entity(), Some("posts"));
    assert!(err.message().contains("unknown entity 'people'"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parse_schema_file(&fixtures_dir().join("does_not_exist.yaml")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert!(err.message().contains("does_not_exist.yaml"));
}

#[test]
fn test_wrong_schema_version_rejected() {
    let err = parse_schema_str(
        r#"
schema_version: 2
entities:
  users: { table: users }
"#,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::SchemaInvalid);
    assert!(err.message().contains("Unsupported schema_version: 2"));
}

#[test]
fn test_duplicate_table_rejected() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  authors: { table: users }
  users: { table: users }
"#,
    )
    .unwrap_err();

    assert!(err.message().contains("Table 'users' is already used by entity 'authors'"));
}

#[test]
fn test_missing_relation_key_rejected() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  users:
    table: users
    relations:
      posts: { kind: has_many, entity: posts }
  posts: { table: posts }
"#,
    )
    .unwrap_err();

    assert_eq!(err.entity(), Some("users"));
    assert!(err
        .message()
        .contains("Relation 'posts': has_many relation requires `foreign_key`"));
}

#[test]
fn test_pivot_keys_required() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  posts:
    table: posts
    relations:
      tags: { kind: belongs_to_many, entity: tags, pivot: post_tag, foreign_pivot_key: post_id }
  tags: { table: tags }
"#,
    )
    .unwrap_err();

    assert!(err.message().contains("related_pivot_key"));
}

#[test]
fn test_join_column_must_be_declared() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  posts:
    table: posts
    columns: [id, title]
    relations:
      author: { kind: belongs_to, entity: users, foreign_key: author_id }
  users: { table: users }
"#,
    )
    .unwrap_err();

    assert!(err.message().contains("undeclared column 'author_id'"));
}

#[test]
fn test_primary_key_must_be_declared() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  tags:
    table: tags
    primary_key: tag_id
    columns: [id, name]
"#,
    )
    .unwrap_err();

    assert!(err.message().contains("Primary key 'tag_id'"));
}

#[test]
fn test_unknown_relation_kind_rejected() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  users:
    table: users
    relations:
      friends: { kind: many_to_many, entity: users }
"#,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::SchemaInvalid);
    assert!(err.message().contains("YAML parse error"));
}

#[test]
fn test_dotted_names_rejected() {
    let err = parse_schema_str(
        r#"
schema_version: 1
entities:
  users:
    table: users
    relations:
      "best.friend": { kind: belongs_to, entity: users, foreign_key: friend_id }
"#,
    )
    .unwrap_err();

    assert!(err.message().contains("Invalid relation name 'best.friend'"));
}
