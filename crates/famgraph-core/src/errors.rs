use thiserror::Error;

use crate::rules::validation::RejectionKind;

/// Result type alias using FamilyError
pub type Result<T> = std::result::Result<T, FamilyError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// depending on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidPerson,
    InvalidRelationship,
    NotFound,
    AlreadyExists,

    // Consistency gate
    ValidationRejected,
    ConfirmationRequired,

    // Graph shape
    ReferentialGap,

    // Exchange
    InvalidDocument,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPerson => "ERR_INVALID_PERSON",
            ExErrorKind::InvalidRelationship => "ERR_INVALID_RELATIONSHIP",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ValidationRejected => "ERR_VALIDATION_REJECTED",
            ExErrorKind::ConfirmationRequired => "ERR_CONFIRMATION_REQUIRED",
            ExErrorKind::ReferentialGap => "ERR_REFERENTIAL_GAP",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context fields. Built from a
/// [`FamilyError`] at logging and API boundaries.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    person_id: Option<String>,
    relationship_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            person_id: None,
            relationship_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add person ID context
    pub fn with_person_id(mut self, id: impl Into<String>) -> Self {
        self.person_id = Some(id.into());
        self
    }

    /// Add relationship ID context
    pub fn with_relationship_id(mut self, id: impl Into<String>) -> Self {
        self.relationship_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn person_id(&self) -> Option<&str> {
        self.person_id.as_deref()
    }

    pub fn relationship_id(&self) -> Option<&str> {
        self.relationship_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(person_id) = &self.person_id {
            write!(f, " (person_id: {})", person_id)?;
        }
        if let Some(relationship_id) = &self.relationship_id {
            write!(f, " (relationship_id: {})", relationship_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for famgraph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FamilyError {
    // ===== Relationship contract =====
    /// Both endpoints of a relationship name the same person
    #[error("A person cannot have a relationship with themselves: {person_id}")]
    SelfRelationship { person_id: String },

    /// A draft names a person that is not in the snapshot
    #[error("Relationship endpoint not found: {person_id}")]
    MissingEndpoint { person_id: String },

    /// A caller-supplied argument could not be interpreted
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Relationship type tag is not one of the known kinds
    #[error("Unknown relationship type: {value}")]
    UnknownRelationshipType { value: String },

    // ===== Consistency gate =====
    /// The validator refused the relationship
    #[error("Relationship rejected ({kind}): {reason}")]
    ValidationRejected { kind: RejectionKind, reason: String },

    /// The validator raised a warning that the caller did not confirm
    #[error("Confirmation required: {warning}")]
    ConfirmationRequired { warning: String },

    // ===== Entity lookups =====
    #[error("Person not found: {person_id}")]
    PersonNotFound { person_id: String },

    #[error("Relationship not found: {relationship_id}")]
    RelationshipNotFound { relationship_id: String },

    #[error("Person already exists: {person_id}")]
    PersonAlreadyExists { person_id: String },

    /// Person record failed field validation
    #[error("Invalid person ({field}): {reason}")]
    InvalidPerson { field: String, reason: String },

    // ===== Exchange =====
    /// A relationship references a person absent from the person set
    #[error("Relationship {relationship_id} references missing person {person_id}")]
    ReferentialGap {
        relationship_id: String,
        person_id: String,
    },

    /// Export document is structurally invalid
    #[error("Invalid family tree document: {reason}")]
    InvalidDocument { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from FamilyError to ExError
impl From<FamilyError> for ExError {
    fn from(err: FamilyError) -> Self {
        match err {
            FamilyError::SelfRelationship { person_id } => {
                ExError::new(ExErrorKind::InvalidRelationship)
                    .with_person_id(person_id)
                    .with_message("A person cannot have a relationship with themselves")
            }

            FamilyError::MissingEndpoint { person_id } => {
                ExError::new(ExErrorKind::InvalidRelationship)
                    .with_person_id(person_id)
                    .with_message("Relationship endpoint not found")
            }

            FamilyError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            FamilyError::UnknownRelationshipType { value } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_message(format!("Unknown relationship type: {}", value))
            }

            FamilyError::ValidationRejected { kind, reason } => {
                ExError::new(ExErrorKind::ValidationRejected)
                    .with_op("validate_relationship")
                    .with_message(format!("{}: {}", kind, reason))
            }

            FamilyError::ConfirmationRequired { warning } => {
                ExError::new(ExErrorKind::ConfirmationRequired)
                    .with_op("validate_relationship")
                    .with_message(warning)
            }

            FamilyError::PersonNotFound { person_id } => ExError::new(ExErrorKind::NotFound)
                .with_person_id(person_id)
                .with_message("Person not found"),

            FamilyError::RelationshipNotFound { relationship_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_relationship_id(relationship_id)
                    .with_message("Relationship not found")
            }

            FamilyError::PersonAlreadyExists { person_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_person_id(person_id)
                    .with_message("Person already exists")
            }

            FamilyError::InvalidPerson { field, reason } => {
                ExError::new(ExErrorKind::InvalidPerson)
                    .with_message(format!("{}: {}", field, reason))
            }

            FamilyError::ReferentialGap {
                relationship_id,
                person_id,
            } => ExError::new(ExErrorKind::ReferentialGap)
                .with_relationship_id(relationship_id)
                .with_person_id(person_id)
                .with_message("Relationship references a missing person"),

            FamilyError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(reason)
            }

            FamilyError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to FamilyError
impl From<serde_json::Error> for FamilyError {
    fn from(err: serde_json::Error) -> Self {
        FamilyError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidRelationship, "ERR_INVALID_RELATIONSHIP"),
            (ExErrorKind::ValidationRejected, "ERR_VALIDATION_REJECTED"),
            (ExErrorKind::ConfirmationRequired, "ERR_CONFIRMATION_REQUIRED"),
            (ExErrorKind::ReferentialGap, "ERR_REFERENTIAL_GAP"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_every_kind_has_a_distinct_code() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::InvalidPerson,
            ExErrorKind::InvalidRelationship,
            ExErrorKind::NotFound,
            ExErrorKind::AlreadyExists,
            ExErrorKind::ValidationRejected,
            ExErrorKind::ConfirmationRequired,
            ExErrorKind::ReferentialGap,
            ExErrorKind::InvalidDocument,
            ExErrorKind::Serialization,
        ];
        // Fails to compile when a kind is added or removed without updating the list
        for kind in kinds {
            match kind {
                ExErrorKind::InvalidInput
                | ExErrorKind::InvalidPerson
                | ExErrorKind::InvalidRelationship
                | ExErrorKind::NotFound
                | ExErrorKind::AlreadyExists
                | ExErrorKind::ValidationRejected
                | ExErrorKind::ConfirmationRequired
                | ExErrorKind::ReferentialGap
                | ExErrorKind::InvalidDocument
                | ExErrorKind::Serialization => {}
            }
        }

        let codes: std::collections::HashSet<&str> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains("ERR_INTERNAL"));
    }

    #[test]
    fn test_self_relationship_maps_to_invalid_relationship() {
        let err: ExError = FamilyError::SelfRelationship {
            person_id: "p1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidRelationship);
        assert_eq!(err.person_id(), Some("p1"));
    }

    #[test]
    fn test_rejection_carries_reason_in_message() {
        let err: ExError = FamilyError::ValidationRejected {
            kind: RejectionKind::SiblingMarriage,
            reason: "Cannot marry sibling".to_string(),
        }
        .into();
        assert_eq!(err.code(), "ERR_VALIDATION_REJECTED");
        assert!(err.message().contains("Cannot marry sibling"));
        assert_eq!(err.op(), Some("validate_relationship"));
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::ReferentialGap)
            .with_op("import")
            .with_relationship_id("r1")
            .with_person_id("p9")
            .with_message("dangling");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_REFERENTIAL_GAP] in operation 'import': dangling"));
        assert!(text.contains("(person_id: p9)"));
        assert!(text.contains("(relationship_id: r1)"));
    }
}
