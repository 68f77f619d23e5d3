pub mod generation;

pub use generation::{compute_generations, GenerationMap};
