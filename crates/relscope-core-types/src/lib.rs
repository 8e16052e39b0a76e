//! Core types shared across relscope facilities
//!
//! This crate provides foundational types used by the error and logging
//! facilities of the query-composition crates:
//!
//! - **Schema constants**: canonical field keys and event names
//! - **Redacted text**: wrapper that keeps caller-supplied search text out of logs

pub mod redacted;
pub mod schema;

pub use redacted::Redacted;
