//! Consistency gate for relationship writes
//!
//! [`validate_relationship`] decides whether a proposed edge may be stored.
//! Structural problems (self-links, unknown endpoints) are errors; graph
//! problems are reported as a [`ValidationOutcome`].

use chrono::NaiveDate;
use std::time::Instant;

use crate::errors::{FamilyError, Result};
use crate::model::{Link, Person, RelationshipDraft};
use crate::queries::kinship::{has_sibling_edge, is_ancestor_excluding};
use crate::snapshot::FamilySnapshot;
use crate::{log_op_end, log_op_error, log_op_start};

use super::invariants;

/// Youngest plausible parent-to-child age gap, in years
pub const MIN_PARENT_AGE_GAP_YEARS: f64 = 12.0;

/// Age gap above which a parent-child edge needs confirmation, in years
pub const MAX_PARENT_AGE_GAP_YEARS: f64 = 70.0;

const DAYS_PER_YEAR: f64 = 365.25;

/// Why a relationship was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Parent is less than twelve years older than the child
    AgeGapTooSmall,
    /// The child is already an ancestor of the parent
    AncestorLoop,
    /// Spouses are in each other's direct line
    DirectLineage,
    /// Spouses are joined by a sibling edge
    SiblingMarriage,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::AgeGapTooSmall => "age_gap_too_small",
            RejectionKind::AncestorLoop => "ancestor_loop",
            RejectionKind::DirectLineage => "direct_lineage",
            RejectionKind::SiblingMarriage => "sibling_marriage",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refused relationship with a human-readable reason
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub reason: String,
}

/// An accepted relationship that needs explicit confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub message: String,
    /// Whole years between the two birth dates
    pub gap_years: u32,
}

/// Result of running the consistency checks on a draft
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Accepted,
    Warning(ValidationWarning),
    Rejected(Rejection),
}

impl ValidationOutcome {
    fn rejected(kind: RejectionKind, reason: impl Into<String>) -> Self {
        ValidationOutcome::Rejected(Rejection {
            kind,
            reason: reason.into(),
        })
    }

    /// False only for rejections; warnings count as valid
    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidationOutcome::Rejected(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Rejected(rejection) => Some(&rejection.reason),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Warning(warning) => Some(&warning.message),
            _ => None,
        }
    }

    /// Turn the outcome into a write decision
    ///
    /// # Errors
    /// * `ValidationRejected` - for a rejection
    /// * `ConfirmationRequired` - for a warning when `confirmed` is false
    pub fn into_result(self, confirmed: bool) -> Result<()> {
        match self {
            ValidationOutcome::Accepted => Ok(()),
            ValidationOutcome::Warning(_) if confirmed => Ok(()),
            ValidationOutcome::Warning(warning) => Err(FamilyError::ConfirmationRequired {
                warning: warning.message,
            }),
            ValidationOutcome::Rejected(rejection) => Err(FamilyError::ValidationRejected {
                kind: rejection.kind,
                reason: rejection.reason,
            }),
        }
    }
}

/// Check a proposed relationship against the snapshot
///
/// Parent-child drafts are checked for loops and then for the age gap.
/// Spouse drafts are checked for direct lineage and then for a sibling edge.
/// Other kinds are accepted. When the draft carries an id, the stored edge
/// with that id is ignored by the ancestry checks.
///
/// # Errors
/// * `SelfRelationship` - if both endpoints are the same person
/// * `MissingEndpoint` - if an endpoint is not in the snapshot
pub fn validate_relationship(
    snapshot: &FamilySnapshot,
    draft: &RelationshipDraft,
) -> Result<ValidationOutcome> {
    log_op_start!(
        "validate_relationship",
        relationship_type = draft.kind.as_str(),
        person1_id = %draft.person1_id,
        person2_id = %draft.person2_id
    );
    let start = Instant::now();

    let outcome = validate_relationship_impl(snapshot, draft).map_err(|e| {
        log_op_error!(
            "validate_relationship",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "validate_relationship",
        duration_ms = start.elapsed().as_millis() as u64,
        valid = outcome.is_valid()
    );

    Ok(outcome)
}

fn validate_relationship_impl(
    snapshot: &FamilySnapshot,
    draft: &RelationshipDraft,
) -> Result<ValidationOutcome> {
    let link = draft.link()?;

    let (first, second) = link.endpoints();
    let first = snapshot
        .person(first)
        .ok_or_else(|| FamilyError::MissingEndpoint {
            person_id: first.to_string(),
        })?;
    let second = snapshot
        .person(second)
        .ok_or_else(|| FamilyError::MissingEndpoint {
            person_id: second.to_string(),
        })?;

    let excluded = draft.id.as_deref();

    let outcome = match link {
        Link::ParentChild { .. } => {
            match validate_no_loop(snapshot, &first.id, &second.id, excluded) {
                ValidationOutcome::Accepted => validate_parent_child_age(first, second),
                refused => refused,
            }
        }
        Link::Spouse(_) => validate_spouse(snapshot, &first.id, &second.id, excluded),
        Link::Sibling(_) | Link::Adopted { .. } | Link::Step { .. } => ValidationOutcome::Accepted,
    };

    Ok(outcome)
}

/// Age-gap check for a parent-child pair
///
/// Skipped when either birth date is unknown. A gap under twelve years is a
/// rejection; over seventy is a warning.
pub fn validate_parent_child_age(parent: &Person, child: &Person) -> ValidationOutcome {
    let (Some(parent_dob), Some(child_dob)) = (parent.date_of_birth, child.date_of_birth) else {
        return ValidationOutcome::Accepted;
    };

    let gap = age_gap_years(parent_dob, child_dob);

    if gap < MIN_PARENT_AGE_GAP_YEARS {
        return ValidationOutcome::rejected(
            RejectionKind::AgeGapTooSmall,
            "Parent must be at least 12 years older than child",
        );
    }

    if gap > MAX_PARENT_AGE_GAP_YEARS {
        let gap_years = gap.floor() as u32;
        return ValidationOutcome::Warning(ValidationWarning {
            message: format!("Age gap seems unusual ({} years). Please verify.", gap_years),
            gap_years,
        });
    }

    ValidationOutcome::Accepted
}

/// Loop check for a proposed `parent_id -> child_id` edge
pub fn validate_no_loop(
    snapshot: &FamilySnapshot,
    parent_id: &str,
    child_id: &str,
    excluded_id: Option<&str>,
) -> ValidationOutcome {
    if is_ancestor_excluding(snapshot, child_id, parent_id, excluded_id) {
        tracing::debug!(parent_id, child_id, "parent-child edge would close a loop");
        return ValidationOutcome::rejected(
            RejectionKind::AncestorLoop,
            "This would create a loop: the child is already an ancestor of the parent",
        );
    }
    ValidationOutcome::Accepted
}

/// Lineage and sibling checks for a proposed spouse pair
pub fn validate_spouse(
    snapshot: &FamilySnapshot,
    a: &str,
    b: &str,
    excluded_id: Option<&str>,
) -> ValidationOutcome {
    if is_ancestor_excluding(snapshot, a, b, excluded_id)
        || is_ancestor_excluding(snapshot, b, a, excluded_id)
    {
        return ValidationOutcome::rejected(
            RejectionKind::DirectLineage,
            "Cannot marry direct blood relative (parent/child/grandparent/etc)",
        );
    }

    if has_sibling_edge(snapshot, a, b) {
        return ValidationOutcome::rejected(RejectionKind::SiblingMarriage, "Cannot marry sibling");
    }

    ValidationOutcome::Accepted
}

/// Check a whole snapshot for graph damage
///
/// Runs the invariant scans and returns the first problem found. Engine
/// functions tolerate both kinds of damage; this is for callers that want
/// to refuse such data up front.
///
/// # Errors
/// * `ReferentialGap` - a relationship names a person not in the snapshot
/// * `ValidationRejected` - a person is their own ancestor
pub fn validate_snapshot(snapshot: &FamilySnapshot) -> Result<()> {
    let dangling = invariants::find_dangling_relationships(snapshot);
    if let Some((relationship_id, person_id)) = dangling.first() {
        return Err(FamilyError::ReferentialGap {
            relationship_id: relationship_id.clone(),
            person_id: person_id.clone(),
        });
    }

    let cycles = invariants::find_parent_cycles(snapshot);
    if let Some(person_id) = cycles.first() {
        return Err(FamilyError::ValidationRejected {
            kind: RejectionKind::AncestorLoop,
            reason: format!("{} is recorded as their own ancestor", person_id),
        });
    }

    Ok(())
}

/// Field checks applied before a person is stored
///
/// # Errors
/// * `InvalidPerson` - naming the first field that fails
pub fn validate_person(person: &Person, today: NaiveDate) -> Result<()> {
    if person.first_name.trim().is_empty() {
        return Err(invalid_person("first_name", "First name is required"));
    }

    if person.birth_order == Some(0) {
        return Err(invalid_person("birth_order", "Birth order starts at 1"));
    }

    if let (Some(born), Some(died)) = (person.date_of_birth, person.date_of_death) {
        if died < born {
            return Err(invalid_person(
                "date_of_death",
                "Date of death cannot be before date of birth",
            ));
        }
    }

    if let Some(born) = person.date_of_birth {
        if born > today {
            return Err(invalid_person(
                "date_of_birth",
                "Date of birth cannot be in the future",
            ));
        }
    }

    Ok(())
}

fn invalid_person(field: &str, reason: &str) -> FamilyError {
    FamilyError::InvalidPerson {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Signed gap from `older` to `younger` in fractional years
fn age_gap_years(older: NaiveDate, younger: NaiveDate) -> f64 {
    (younger - older).num_days() as f64 / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Relationship;

    fn born(id: &str, y: i32, m: u32, d: u32) -> Person {
        let mut p = Person::new(id, id.to_uppercase());
        p.date_of_birth = NaiveDate::from_ymd_opt(y, m, d);
        p
    }

    #[test]
    fn test_age_gap_under_twelve_rejected() {
        let outcome = validate_parent_child_age(&born("p", 2000, 1, 1), &born("c", 2010, 1, 1));
        assert!(matches!(
            outcome,
            ValidationOutcome::Rejected(Rejection {
                kind: RejectionKind::AgeGapTooSmall,
                ..
            })
        ));
    }

    #[test]
    fn test_child_older_than_parent_rejected() {
        let outcome = validate_parent_child_age(&born("p", 2000, 1, 1), &born("c", 1980, 1, 1));
        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_age_gap_over_seventy_warns() {
        let outcome = validate_parent_child_age(&born("p", 1900, 1, 1), &born("c", 1975, 6, 1));
        assert!(outcome.is_valid());
        assert_eq!(
            outcome.warning(),
            Some("Age gap seems unusual (75 years). Please verify.")
        );
    }

    #[test]
    fn test_unknown_birth_date_skips_age_check() {
        let outcome =
            validate_parent_child_age(&Person::new("p", "P"), &born("c", 2010, 1, 1));
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn test_self_relationship_is_error() {
        let snapshot = FamilySnapshot::new(vec![Person::new("a", "A")], vec![]);
        let result = validate_relationship(&snapshot, &RelationshipDraft::spouse("a", "a"));
        assert!(matches!(result, Err(FamilyError::SelfRelationship { .. })));
    }

    #[test]
    fn test_missing_endpoint_is_error() {
        let snapshot = FamilySnapshot::new(vec![Person::new("a", "A")], vec![]);
        let result = validate_relationship(&snapshot, &RelationshipDraft::spouse("a", "ghost"));
        assert!(matches!(
            result,
            Err(FamilyError::MissingEndpoint { person_id }) if person_id == "ghost"
        ));
    }

    #[test]
    fn test_sibling_marriage_rejected() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("a", "A"), Person::new("b", "B")],
            vec![Relationship::sibling("s", "b", "a").unwrap()],
        );
        let outcome = validate_relationship(&snapshot, &RelationshipDraft::spouse("a", "b")).unwrap();
        assert_eq!(outcome.reason(), Some("Cannot marry sibling"));
    }

    #[test]
    fn test_revalidating_existing_edge_ignores_itself() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("a", "A"), Person::new("b", "B")],
            vec![Relationship::parent_child("r1", "a", "b").unwrap()],
        );

        let fresh = RelationshipDraft::parent_child("b", "a");
        let outcome = validate_relationship(&snapshot, &fresh).unwrap();
        assert!(!outcome.is_valid());

        let reversed = RelationshipDraft::parent_child("b", "a").with_id("r1");
        let outcome = validate_relationship(&snapshot, &reversed).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_into_result_requires_confirmation_for_warnings() {
        let outcome = ValidationOutcome::Warning(ValidationWarning {
            message: "check".to_string(),
            gap_years: 80,
        });
        assert!(matches!(
            outcome.clone().into_result(false),
            Err(FamilyError::ConfirmationRequired { .. })
        ));
        assert!(outcome.into_result(true).is_ok());
    }

    #[test]
    fn test_validate_snapshot_reports_first_gap() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("a", "A")],
            vec![Relationship::parent_child("r1", "a", "gone").unwrap()],
        );
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(FamilyError::ReferentialGap { relationship_id, .. }) if relationship_id == "r1"
        ));
    }

    #[test]
    fn test_validate_person_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(validate_person(&Person::new("p", "Ann"), today).is_ok());

        let blank = Person::new("p", "  ");
        assert!(matches!(
            validate_person(&blank, today),
            Err(FamilyError::InvalidPerson { field, .. }) if field == "first_name"
        ));

        let mut early_death = born("p", 1950, 1, 1);
        early_death.date_of_death = NaiveDate::from_ymd_opt(1940, 1, 1);
        assert!(matches!(
            validate_person(&early_death, today),
            Err(FamilyError::InvalidPerson { field, .. }) if field == "date_of_death"
        ));

        let unborn = born("p", 2030, 1, 1);
        assert!(matches!(
            validate_person(&unborn, today),
            Err(FamilyError::InvalidPerson { field, .. }) if field == "date_of_birth"
        ));
    }
}
