//! Read-only queries over a family snapshot

pub mod kinship;

pub use kinship::{
    children_of, declared_siblings_of, has_sibling_edge, is_ancestor, is_ancestor_excluding,
    parents_of, siblings_of, spouses_of,
};
