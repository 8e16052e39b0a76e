#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{blog_db, ids, query, sorted_ids};
use relscope_core::logging_facility::test_capture::init_test_capture;
use relscope_core::{
    order, search, search_any, select_related, when_where, when_where_in, where_date_between,
    ExErrorKind, Operator, QueryBuilder, ScopeExt, Value,
};
use relscope_core_types::schema::{EVENT_END, EVENT_START};
use relscope_store::{count_rows, fetch_rows};

#[test]
fn test_search_through_belongs_to() {
    // Given the blog fixture
    let conn = blog_db();
    let mut q = query("posts");

    // When searching posts by author name
    search(&mut q, "author.name", "ada").unwrap();

    // Then only Ada's posts match (LIKE is case-insensitive for ASCII)
    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(sorted_ids(&rows), vec![1, 4]);
}

#[test]
fn test_search_any_across_has_one() {
    let conn = blog_db();
    let mut q = query("users");

    search_any(&mut q, &["name", "profile.bio"], "data").unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(ids(&rows), vec![2]);
}

#[test]
fn test_search_any_composes_with_other_filters() {
    let conn = blog_db();
    let mut q = query("users");

    // "a" matches every name; the OR group must not swallow the id filter
    search_any(&mut q, &["name", "profile.bio"], "a").unwrap();
    when_where(&mut q, "id", Operator::Gt, 2).unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(sorted_ids(&rows), vec![3, 4]);
}

#[test]
fn test_membership_through_pivot() {
    let conn = blog_db();
    let mut q = query("posts");

    when_where_in(&mut q, "tags.slug", vec!["db"]).unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(sorted_ids(&rows), vec![2, 4]);
}

#[test]
fn test_membership_through_reverse_pivot_and_belongs_to() {
    let conn = blog_db();
    let mut q = query("tags");

    search(&mut q, "posts.author.name", "chen").unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(sorted_ids(&rows), vec![1, 3]);
}

#[test]
fn test_membership_two_relations_deep() {
    let conn = blog_db();
    let mut q = query("comments");

    when_where_in(&mut q, "author.profile.rank", vec![1, 2]).unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(sorted_ids(&rows), vec![1, 2]);
}

#[test]
fn test_has_many_existence() {
    let conn = blog_db();
    let mut q = query("posts");

    search(&mut q, "comments.body", "thanks").unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(ids(&rows), vec![1]);
}

#[test]
fn test_date_range_bounds() {
    let conn = blog_db();
    let none: Option<&str> = None;

    let mut march = query("posts");
    where_date_between(&mut march, "published_at", "2024-03-01", "2024-03-31").unwrap();
    assert_eq!(sorted_ids(&fetch_rows(&conn, &march).unwrap()), vec![1, 2]);

    let mut from_april = query("posts");
    where_date_between(&mut from_april, "published_at", "2024-04-01", none).unwrap();
    assert_eq!(sorted_ids(&fetch_rows(&conn, &from_april).unwrap()), vec![3, 4]);

    let mut until_march_15 = query("posts");
    where_date_between(&mut until_march_15, "published_at", "", "2024-03-15").unwrap();
    assert_eq!(
        sorted_ids(&fetch_rows(&conn, &until_march_15).unwrap()),
        vec![1, 2]
    );
}

#[test]
fn test_range_where_on_column() {
    let conn = blog_db();
    let mut q = query("posts");

    when_where(&mut q, "views", Operator::Gt, 100).unwrap();

    assert_eq!(sorted_ids(&fetch_rows(&conn, &q).unwrap()), vec![1, 3]);
}

#[test]
fn test_order_through_relation_with_nulls() {
    // Given Dana has no profile
    let conn = blog_db();
    let mut q = query("users");

    // When ordering users by profile rank
    order(&mut q, "profile.rank", "asc").unwrap();

    // Then the missing rank sorts first, the rest by rank
    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(ids(&rows), vec![4, 2, 3, 1]);
}

#[test]
fn test_order_through_self_relation() {
    let conn = blog_db();
    let mut q = query("posts");

    order(&mut q, "author.manager.name", "DESC").unwrap();
    order(&mut q, "id", "asc").unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(ids(&rows), vec![3, 2, 1, 4]);
}

#[test]
fn test_select_related_projects_scalar_subquery() {
    let conn = blog_db();
    let mut q = query("posts");

    select_related(&mut q, "id", None).unwrap();
    select_related(&mut q, "author.profile.rank", None).unwrap();
    select_related(&mut q, "author.name", Some("writer")).unwrap();
    order(&mut q, "id", "asc").unwrap();

    let rows = fetch_rows(&conn, &q).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[1].column_names().collect::<Vec<_>>(),
        vec!["id", "author_profile_rank", "writer"]
    );
    assert_eq!(rows[0].get("author_profile_rank"), Some(&Value::Integer(3)));
    assert_eq!(rows[2].get("writer"), Some(&Value::from("Chen")));
}

#[test]
fn test_like_metacharacters_match_literally() {
    let conn = blog_db();

    let mut percent = query("profiles");
    search(&mut percent, "bio", "%").unwrap();
    assert_eq!(ids(&fetch_rows(&conn, &percent).unwrap()), vec![3]);

    let mut underscore = query("profiles");
    search(&mut underscore, "bio", "t_f").unwrap();
    assert_eq!(ids(&fetch_rows(&conn, &underscore).unwrap()), vec![3]);
}

#[test]
fn test_absent_values_return_everything() {
    let conn = blog_db();
    let mut q = query("posts");
    let no_slugs: Vec<&str> = Vec::new();

    search_any(&mut q, &["title", "author.name"], "").unwrap();
    when_where_in(&mut q, "tags.slug", no_slugs).unwrap();
    order(&mut q, "author.name", "").unwrap();

    assert_eq!(q.to_sql(), "SELECT \"posts\".* FROM \"posts\"");
    assert_eq!(fetch_rows(&conn, &q).unwrap().len(), 4);
}

#[test]
fn test_full_composition_with_pagination() {
    let conn = blog_db();
    let mut q = query("posts");

    q.search_any(&["title", "author.name"], "a")
        .unwrap()
        .when_where_in("tags.slug", vec!["rust", "db"])
        .unwrap()
        .order("views", "desc")
        .unwrap();
    assert_eq!(ids(&fetch_rows(&conn, &q).unwrap()), vec![3, 1, 2, 4]);

    q.limit(2).unwrap();
    q.offset(1);
    assert_eq!(ids(&fetch_rows(&conn, &q).unwrap()), vec![1, 2]);
}

#[test]
fn test_count_rows() {
    let conn = blog_db();
    let mut q = query("posts");

    when_where_in(&mut q, "tags.slug", vec!["rust"]).unwrap();

    assert_eq!(count_rows(&conn, &q).unwrap(), 2);
}

#[test]
fn test_missing_table_is_persistence_error() {
    let conn = relscope_store::db::open_in_memory().unwrap();
    let q = query("posts");

    let err = fetch_rows(&conn, &q).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.message().contains("posts"));
}

#[test]
fn test_undeclared_column_rejected_before_execution() {
    let mut q = query("users");

    let err = search(&mut q, "profile.shoe_size", "42").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnknownAttribute);
    assert_eq!(err.entity(), Some("profiles"));
}

#[test]
fn test_unknown_relationship_from_schema() {
    let mut q = query("users");

    let err = when_where_in(&mut q, "a.b.c", vec![1]).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnknownRelationship);
    assert_eq!(err.entity(), Some("users"));
    assert_eq!(err.path(), Some("a"));
}

#[test]
fn test_fetch_rows_logs_start_and_end() {
    let capture = init_test_capture();
    let conn = blog_db();
    let mut q = query("comments");
    search(&mut q, "body", "no-such-comment-body").unwrap();

    fetch_rows(&conn, &q).unwrap();

    let events: Vec<_> = capture
        .events_for_op("fetch_rows")
        .into_iter()
        .filter(|e| e.field("entity") == Some("comments"))
        .collect();
    assert!(events.iter().any(|e| e.event.as_deref() == Some(EVENT_START)));
    capture.assert_event_exists("fetch_rows", EVENT_END);
}
