//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across every engine operation.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_PERSON_ID: &str = "person_id";
pub const FIELD_RELATIONSHIP_ID: &str = "relationship_id";
pub const FIELD_ROOT_ID: &str = "root_id";
pub const FIELD_FOCUS_ID: &str = "focus_id";

// Collection sizes
pub const FIELD_PERSON_COUNT: &str = "person_count";
pub const FIELD_RELATIONSHIP_COUNT: &str = "relationship_count";
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_EDGE_COUNT: &str = "edge_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
