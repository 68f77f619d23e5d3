pub mod store;

pub use store::{EntityStore, MemoryStore, QuickAddRole};
