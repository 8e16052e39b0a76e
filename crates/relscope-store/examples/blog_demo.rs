//! Composition Demo
//!
//! Builds a few queries over a small in-memory blog database and prints the
//! SQL next to the rows it returns.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Searching across a column and a related column in one OR group
//! 2. Membership filters through a pivot table
//! 3. Projection and ordering through relationship chains
//! 4. Absent inputs leaving the query untouched

use relscope_core::{QueryBuilder, ScopeExt};
use relscope_store::{db, fetch_rows, parse_schema_str, SqlQuery};
use std::sync::Arc;

const SCHEMA: &str = r#"
schema_version: 1
entities:
  users:
    table: users
    relations:
      profile: { kind: has_one, entity: profiles, foreign_key: user_id }
  profiles:
    table: profiles
  posts:
    table: posts
    relations:
      author: { kind: belongs_to, entity: users, foreign_key: author_id }
      tags:
        kind: belongs_to_many
        entity: tags
        pivot: post_tag
        foreign_pivot_key: post_id
        related_pivot_key: tag_id
  tags:
    table: tags
"#;

const DATA: &str = r#"
CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
CREATE TABLE profiles (id INTEGER PRIMARY KEY, user_id INTEGER, bio TEXT, rank INTEGER);
CREATE TABLE posts (id INTEGER PRIMARY KEY, author_id INTEGER, title TEXT);
CREATE TABLE tags (id INTEGER PRIMARY KEY, slug TEXT);
CREATE TABLE post_tag (post_id INTEGER, tag_id INTEGER);

INSERT INTO users VALUES (1, 'Ada'), (2, 'Brian');
INSERT INTO profiles VALUES (1, 1, 'Writes compilers', 2), (2, 2, 'Likes databases', 1);
INSERT INTO posts VALUES (1, 1, 'Parsing with Rust'), (2, 2, 'SQLite tips'), (3, 1, 'Query planning');
INSERT INTO tags VALUES (1, 'rust'), (2, 'db');
INSERT INTO post_tag VALUES (1, 1), (2, 2), (3, 2);
"#;

fn show(conn: &rusqlite::Connection, query: &SqlQuery) {
    let (sql, bindings) = query.render();
    println!("SQL:      {}", sql);
    println!("Bindings: {}", serde_json::to_string(&bindings).unwrap());
    for row in fetch_rows(conn, query).unwrap() {
        println!("  {}", serde_json::to_string(&row).unwrap());
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== relscope Composition Demo ===\n");

    let schema = Arc::new(parse_schema_str(SCHEMA)?);
    let conn = db::open_in_memory()?;
    conn.execute_batch(DATA)?;

    // ===== Part 1: Search across a column and a related column =====
    println!("## Part 1: users matching 'data' by name or profile bio\n");
    let mut users = SqlQuery::new(schema.clone(), "users")?;
    users.search_any(&["name", "profile.bio"], "data")?;
    show(&conn, &users);

    // ===== Part 2: Membership through the pivot table =====
    println!("## Part 2: posts tagged 'db'\n");
    let mut posts = SqlQuery::new(schema.clone(), "posts")?;
    posts.when_where_in("tags.slug", vec!["db"])?;
    show(&conn, &posts);

    // ===== Part 3: Projection and ordering through relationships =====
    println!("## Part 3: posts with author rank, best-ranked author first\n");
    let mut ranked = SqlQuery::new(schema.clone(), "posts")?;
    ranked
        .select_related("title", None)?
        .select_related("author.profile.rank", None)?
        .order("author.profile.rank", "asc")?;
    show(&conn, &ranked);

    // ===== Part 4: Absent inputs =====
    println!("## Part 4: empty search text, empty slug list, unknown direction\n");
    let mut untouched = SqlQuery::new(schema, "posts")?;
    let no_slugs: Vec<&str> = Vec::new();
    untouched
        .search_any(&["title", "author.name"], "")?
        .when_where_in("tags.slug", no_slugs)?
        .order("title", "sideways")?;
    untouched.limit(2)?;
    show(&conn, &untouched);

    println!("=== Demo Complete ===");
    Ok(())
}
