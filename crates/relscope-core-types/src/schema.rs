//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Query composition
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_PATH: &str = "path";
pub const FIELD_RELATION: &str = "relation";
pub const FIELD_DEPTH: &str = "depth";
pub const FIELD_DIRECTION: &str = "direction";

// Result sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_BINDING_COUNT: &str = "binding_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
