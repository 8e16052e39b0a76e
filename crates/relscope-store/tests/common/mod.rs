//! Blog fixture shared by the store integration tests

use relscope_core::Value;
use relscope_store::{db, parse_schema_file, Row, Schema, SqlQuery};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// users, profiles, posts, comments, tags and the post_tag pivot
#[allow(dead_code)]
pub fn blog_schema() -> Arc<Schema> {
    let schema = parse_schema_file(&fixtures_dir().join("blog_schema.yaml"))
        .expect("blog schema parses");
    Arc::new(schema)
}

/// In-memory database seeded with the blog fixture rows
#[allow(dead_code)]
pub fn blog_db() -> Connection {
    let conn = db::open_in_memory().expect("open in-memory db");
    db::configure(&conn).expect("configure db");
    conn.execute_batch(include_str!("../fixtures/blog.sql"))
        .expect("seed blog fixture");
    conn
}

/// Root query over a blog entity
#[allow(dead_code)]
pub fn query(entity: &str) -> SqlQuery {
    SqlQuery::new(blog_schema(), entity).expect("entity exists")
}

/// `id` column of each row, in result order
#[allow(dead_code)]
pub fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| match row.get("id") {
            Some(Value::Integer(id)) => *id,
            other => panic!("row without integer id: {:?}", other),
        })
        .collect()
}

/// `ids`, sorted, for assertions that do not depend on row order
#[allow(dead_code)]
pub fn sorted_ids(rows: &[Row]) -> Vec<i64> {
    let mut ids = ids(rows);
    ids.sort_unstable();
    ids
}
