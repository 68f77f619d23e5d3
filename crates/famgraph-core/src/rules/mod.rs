pub mod invariants;
pub mod validation;

pub use validation::{
    validate_no_loop, validate_parent_child_age, validate_person, validate_relationship,
    validate_snapshot, validate_spouse, Rejection, RejectionKind, ValidationOutcome,
    ValidationWarning,
};
