//! Core types shared across famgraph facilities
//!
//! Holds the canonical schema constants used by the logging facility and by
//! callers that assert on emitted events.

pub mod schema;
