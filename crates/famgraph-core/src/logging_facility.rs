//! Structured logging facility for famgraph
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use famgraph_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Engine operations bracket their work with `log_op_start!` and `log_op_end!`;
//! degraded graph shapes (dangling edges, revisits) are reported at `debug`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
