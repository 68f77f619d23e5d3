//! famgraph core - family relationship graph engine
//!
//! This crate provides the engine behind a family tree, including:
//! - Person and Relationship models with typed relationship endpoints
//! - Kinship derivation (parents, children, spouses, siblings, ancestry)
//! - A consistency gate that refuses loops, implausible parents and
//!   marriages inside one line of descent
//! - Generation assignment from one or more roots
//! - Deterministic tree layout and depth-bounded views
//! - An in-memory entity store and the export/import document
//!
//! Every engine function is pure over a caller-supplied [`FamilySnapshot`].

pub mod errors;
pub mod exchange;
pub mod layout;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod queries;
pub mod rules;
pub mod snapshot;
pub mod traversal;

// Used by the exported logging macros
pub use famgraph_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, FamilyError, Result};
pub use exchange::{ExportDocument, Overlap};
pub use layout::{filter_by_depth, layout_tree, LayoutConfig, LayoutDirection, TreeLayout};
pub use model::{Gender, Link, Metadata, Person, Relationship, RelationshipDraft, RelationshipType};
pub use ops::{EntityStore, MemoryStore};
pub use rules::{validate_relationship, ValidationOutcome};
pub use snapshot::FamilySnapshot;
pub use traversal::{compute_generations, GenerationMap};
