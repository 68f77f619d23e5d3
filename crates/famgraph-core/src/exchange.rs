//! Export/import document
//!
//! A JSON document carrying a whole family tree:
//!
//! ```json
//! { "version": "1.0", "exportDate": "...", "data": {
//!     "persons": [...], "relationships": [...], "familyGroups": [...] } }
//! ```
//!
//! `data.persons` and `data.relationships` are required. A document that
//! does not match this shape is refused as a whole. A relationship that has
//! the right shape but cannot exist, such as one joining a person to
//! themselves, is set aside and reported by [`check_referential_integrity`]
//! instead of failing the import.
//!
//! Import-side helpers check the document against the persons already held
//! by the caller. They only compare ids; merging is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::errors::{FamilyError, Result};
use crate::model::{FamilyGroup, Person, Relationship, RelationshipRecord};
use crate::snapshot::FamilySnapshot;
use crate::{log_op_end, log_op_error, log_op_start};

/// Version string written into new documents
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub data: ExportData,
    /// Relationships set aside while parsing
    #[serde(skip)]
    pub malformed: Vec<MalformedRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub persons: Vec<Person>,
    pub relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_groups: Option<Vec<FamilyGroup>>,
}

/// A relationship record that decoded but could not be built
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRelationship {
    pub relationship_id: String,
    pub error: FamilyError,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    version: String,
    export_date: DateTime<Utc>,
    data: WireData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireData {
    persons: Vec<Person>,
    relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    family_groups: Option<Vec<FamilyGroup>>,
}

impl WireDocument {
    fn into_document(self) -> ExportDocument {
        let mut relationships = Vec::with_capacity(self.data.relationships.len());
        let mut malformed = Vec::new();

        for record in self.data.relationships {
            let relationship_id = record.id.clone();
            match Relationship::try_from(record) {
                Ok(rel) => relationships.push(rel),
                Err(error) => {
                    tracing::warn!(relationship_id = %relationship_id, %error, "setting aside malformed relationship");
                    malformed.push(MalformedRelationship {
                        relationship_id,
                        error,
                    });
                }
            }
        }

        ExportDocument {
            version: self.version,
            export_date: self.export_date,
            data: ExportData {
                persons: self.data.persons,
                relationships,
                family_groups: self.data.family_groups,
            },
            malformed,
        }
    }
}

impl ExportDocument {
    /// # Errors
    /// * `Serialization` - if encoding fails
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot over the document's persons and relationships
    pub fn to_snapshot(&self) -> FamilySnapshot {
        FamilySnapshot::new(self.data.persons.clone(), self.data.relationships.clone())
    }

    pub fn person_ids(&self) -> impl Iterator<Item = &str> {
        self.data.persons.iter().map(|p| p.id.as_str())
    }
}

/// Build a document from a snapshot
pub fn export_document(
    snapshot: &FamilySnapshot,
    family_groups: Option<Vec<FamilyGroup>>,
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        version: EXPORT_FORMAT_VERSION.to_string(),
        export_date: now,
        data: ExportData {
            persons: snapshot.persons().to_vec(),
            relationships: snapshot.relationships().to_vec(),
            family_groups,
        },
        malformed: Vec::new(),
    }
}

/// Decode a document
///
/// Relationships whose endpoints coincide are moved to
/// [`ExportDocument::malformed`] rather than failing the parse.
///
/// # Errors
/// * `Serialization` - if the JSON does not match the document shape,
///   including a `data` object without `persons` or `relationships`
/// * `InvalidDocument` - if the version string is empty
pub fn parse_document(json: &str) -> Result<ExportDocument> {
    log_op_start!("parse_document", bytes = json.len() as u64);
    let start = Instant::now();

    let result = serde_json::from_str::<WireDocument>(json)
        .map_err(FamilyError::from)
        .and_then(|wire| {
            if wire.version.trim().is_empty() {
                return Err(FamilyError::InvalidDocument {
                    reason: "missing version".to_string(),
                });
            }
            Ok(wire.into_document())
        });

    match result {
        Ok(doc) => {
            log_op_end!(
                "parse_document",
                duration_ms = start.elapsed().as_millis() as u64,
                person_count = doc.data.persons.len() as u64,
                relationship_count = doc.data.relationships.len() as u64,
                malformed_count = doc.malformed.len() as u64
            );
            Ok(doc)
        }
        Err(e) => {
            log_op_error!(
                "parse_document",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// How many incoming ids are new versus already held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub new_count: usize,
    pub duplicate_count: usize,
}

/// Compare incoming ids against existing ones by identity only
pub fn detect_overlap<'a, 'b>(
    existing_ids: impl IntoIterator<Item = &'a str>,
    incoming_ids: impl IntoIterator<Item = &'b str>,
) -> Overlap {
    let existing: HashSet<&str> = existing_ids.into_iter().collect();

    let mut overlap = Overlap {
        new_count: 0,
        duplicate_count: 0,
    };
    for id in incoming_ids {
        if existing.contains(id) {
            overlap.duplicate_count += 1;
        } else {
            overlap.new_count += 1;
        }
    }
    overlap
}

/// Why a relationship was left out of an import
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// First endpoint not found in the combined person set
    MissingPerson { person_id: String },
    /// The record could not be built into a relationship
    Malformed { error: FamilyError },
}

/// A relationship left out of an import
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRelationship {
    pub relationship_id: String,
    pub reason: DropReason,
}

impl DroppedRelationship {
    pub fn missing_person_id(&self) -> Option<&str> {
        match &self.reason {
            DropReason::MissingPerson { person_id } => Some(person_id.as_str()),
            DropReason::Malformed { .. } => None,
        }
    }

    pub fn to_error(&self) -> FamilyError {
        match &self.reason {
            DropReason::MissingPerson { person_id } => FamilyError::ReferentialGap {
                relationship_id: self.relationship_id.clone(),
                person_id: person_id.clone(),
            },
            DropReason::Malformed { error } => error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntegrityReport {
    pub accepted: Vec<Relationship>,
    pub dropped: Vec<DroppedRelationship>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Split a document's relationships by whether both endpoints will exist
///
/// The person set is the union of `existing_person_ids` and the document's
/// own persons. Relationships set aside by [`parse_document`] are reported
/// first, as [`DropReason::Malformed`].
pub fn check_referential_integrity<'a>(
    existing_person_ids: impl IntoIterator<Item = &'a str>,
    document: &ExportDocument,
) -> IntegrityReport {
    log_op_start!(
        "check_referential_integrity",
        relationship_count = document.data.relationships.len() as u64
    );
    let start = Instant::now();

    let mut known: HashSet<&str> = existing_person_ids.into_iter().collect();
    known.extend(document.person_ids());

    let mut report = IntegrityReport::default();
    report
        .dropped
        .extend(document.malformed.iter().map(|m| DroppedRelationship {
            relationship_id: m.relationship_id.clone(),
            reason: DropReason::Malformed {
                error: m.error.clone(),
            },
        }));

    for rel in &document.data.relationships {
        let (a, b) = rel.link.endpoints();
        match [a, b].into_iter().find(|id| !known.contains(id)) {
            Some(missing) => {
                tracing::warn!(relationship_id = %rel.id, person_id = missing, "dropping relationship with missing endpoint");
                report.dropped.push(DroppedRelationship {
                    relationship_id: rel.id.clone(),
                    reason: DropReason::MissingPerson {
                        person_id: missing.to_string(),
                    },
                });
            }
            None => report.accepted.push(rel.clone()),
        }
    }

    log_op_end!(
        "check_referential_integrity",
        duration_ms = start.elapsed().as_millis() as u64,
        accepted = report.accepted.len() as u64,
        dropped = report.dropped.len() as u64
    );

    report
}

/// Headline figures shown before an import is confirmed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportStats {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub persons: usize,
    pub relationships: usize,
    pub family_groups: usize,
}

pub fn import_stats(document: &ExportDocument) -> ImportStats {
    ImportStats {
        version: document.version.clone(),
        export_date: document.export_date,
        persons: document.data.persons.len(),
        relationships: document.data.relationships.len(),
        family_groups: document.data.family_groups.as_ref().map_or(0, Vec::len),
    }
}
