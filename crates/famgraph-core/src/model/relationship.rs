use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::metadata::Metadata;
use crate::errors::{FamilyError, Result};

/// Closed set of relationship kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    ParentChild,
    Spouse,
    Sibling,
    Adopted,
    Step,
}

impl RelationshipType {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::ParentChild => "PARENT_CHILD",
            RelationshipType::Spouse => "SPOUSE",
            RelationshipType::Sibling => "SIBLING",
            RelationshipType::Adopted => "ADOPTED",
            RelationshipType::Step => "STEP",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = FamilyError;

    /// Accepts the wire tag in any case, with `-` or `_` as separator
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PARENT_CHILD" => Ok(RelationshipType::ParentChild),
            "SPOUSE" => Ok(RelationshipType::Spouse),
            "SIBLING" => Ok(RelationshipType::Sibling),
            "ADOPTED" => Ok(RelationshipType::Adopted),
            "STEP" => Ok(RelationshipType::Step),
            _ => Err(FamilyError::UnknownRelationshipType {
                value: value.to_string(),
            }),
        }
    }
}

/// Unordered pair of person ids
///
/// `PersonPair::new("a", "b") == PersonPair::new("b", "a")`. The stored
/// order is only kept so a record round-trips with the endpoints it was
/// written with.
#[derive(Debug, Clone, Eq)]
pub struct PersonPair {
    first: String,
    second: String,
}

impl PersonPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            first: a.into(),
            second: b.into(),
        }
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.first == person_id || self.second == person_id
    }

    /// The partner of `person_id`, if it is a member of the pair
    pub fn other(&self, person_id: &str) -> Option<&str> {
        if self.first == person_id {
            Some(&self.second)
        } else if self.second == person_id {
            Some(&self.first)
        } else {
            None
        }
    }

    /// True when the pair consists of exactly `a` and `b`, in either order
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

impl PartialEq for PersonPair {
    fn eq(&self, other: &Self) -> bool {
        self.connects(&other.first, &other.second)
    }
}

/// Typed endpoints of a relationship
///
/// Parent-child edges name their direction; spouse and sibling edges are
/// unordered pairs. Adopted and step edges are stored as recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    ParentChild { parent_id: String, child_id: String },
    Spouse(PersonPair),
    Sibling(PersonPair),
    Adopted { person1_id: String, person2_id: String },
    Step { person1_id: String, person2_id: String },
}

impl Link {
    /// Build a link from the flat wire representation
    ///
    /// # Errors
    /// * `SelfRelationship` - if both endpoints are the same person
    pub fn from_parts(
        kind: RelationshipType,
        person1_id: impl Into<String>,
        person2_id: impl Into<String>,
    ) -> Result<Self> {
        let person1_id = person1_id.into();
        let person2_id = person2_id.into();

        if person1_id == person2_id {
            return Err(FamilyError::SelfRelationship {
                person_id: person1_id,
            });
        }

        Ok(match kind {
            RelationshipType::ParentChild => Link::ParentChild {
                parent_id: person1_id,
                child_id: person2_id,
            },
            RelationshipType::Spouse => Link::Spouse(PersonPair::new(person1_id, person2_id)),
            RelationshipType::Sibling => Link::Sibling(PersonPair::new(person1_id, person2_id)),
            RelationshipType::Adopted => Link::Adopted {
                person1_id,
                person2_id,
            },
            RelationshipType::Step => Link::Step {
                person1_id,
                person2_id,
            },
        })
    }

    pub fn kind(&self) -> RelationshipType {
        match self {
            Link::ParentChild { .. } => RelationshipType::ParentChild,
            Link::Spouse(_) => RelationshipType::Spouse,
            Link::Sibling(_) => RelationshipType::Sibling,
            Link::Adopted { .. } => RelationshipType::Adopted,
            Link::Step { .. } => RelationshipType::Step,
        }
    }

    /// Endpoints in wire order (`person1_id`, `person2_id`)
    pub fn endpoints(&self) -> (&str, &str) {
        match self {
            Link::ParentChild {
                parent_id,
                child_id,
            } => (parent_id, child_id),
            Link::Spouse(pair) | Link::Sibling(pair) => pair.ids(),
            Link::Adopted {
                person1_id,
                person2_id,
            }
            | Link::Step {
                person1_id,
                person2_id,
            } => (person1_id, person2_id),
        }
    }

    pub fn involves(&self, person_id: &str) -> bool {
        let (a, b) = self.endpoints();
        a == person_id || b == person_id
    }
}

/// A stored relationship between two persons
///
/// Serialised in the flat `type`/`person1_id`/`person2_id` shape; decoding a
/// record whose endpoints coincide fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RelationshipRecord", into = "RelationshipRecord")]
pub struct Relationship {
    pub id: String,
    pub link: Link,
    /// Marriage date for spouse edges
    pub start_date: Option<NaiveDate>,
    /// Divorce date for spouse edges
    pub end_date: Option<NaiveDate>,
    pub metadata: Option<Metadata>,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(id: impl Into<String>, link: Link) -> Self {
        Self {
            id: id.into(),
            link,
            start_date: None,
            end_date: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    /// # Errors
    /// * `SelfRelationship` - if parent and child are the same person
    pub fn parent_child(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        child_id: impl Into<String>,
    ) -> Result<Self> {
        let link = Link::from_parts(RelationshipType::ParentChild, parent_id, child_id)?;
        Ok(Self::new(id, link))
    }

    /// # Errors
    /// * `SelfRelationship` - if both spouses are the same person
    pub fn spouse(
        id: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Result<Self> {
        let link = Link::from_parts(RelationshipType::Spouse, a, b)?;
        Ok(Self::new(id, link))
    }

    /// # Errors
    /// * `SelfRelationship` - if both siblings are the same person
    pub fn sibling(
        id: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
    ) -> Result<Self> {
        let link = Link::from_parts(RelationshipType::Sibling, a, b)?;
        Ok(Self::new(id, link))
    }

    pub fn kind(&self) -> RelationshipType {
        self.link.kind()
    }

    pub fn involves(&self, person_id: &str) -> bool {
        self.link.involves(person_id)
    }
}

/// Flat wire shape shared by export documents and the entity store
///
/// Decoding a record does not check the endpoints; converting it into a
/// [`Relationship`] does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RelationshipRecord {
    pub(crate) id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    person1_id: String,
    person2_id: String,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = FamilyError;

    fn try_from(record: RelationshipRecord) -> Result<Self> {
        let link = Link::from_parts(record.kind, record.person1_id, record.person2_id)?;
        Ok(Self {
            id: record.id,
            link,
            start_date: record.start_date,
            end_date: record.end_date,
            metadata: record.metadata,
            created_at: record.created_at,
        })
    }
}

impl From<Relationship> for RelationshipRecord {
    fn from(relationship: Relationship) -> Self {
        let kind = relationship.link.kind();
        let (person1_id, person2_id) = relationship.link.endpoints();
        Self {
            id: relationship.id.clone(),
            kind,
            person1_id: person1_id.to_string(),
            person2_id: person2_id.to_string(),
            start_date: relationship.start_date,
            end_date: relationship.end_date,
            metadata: relationship.metadata,
            created_at: relationship.created_at,
        }
    }
}

/// A relationship proposed for creation
///
/// `id` is set when an existing edge is being re-validated; that edge is
/// then left out of the ancestry checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDraft {
    pub id: Option<String>,
    pub kind: RelationshipType,
    pub person1_id: String,
    pub person2_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub metadata: Option<Metadata>,
}

impl RelationshipDraft {
    pub fn new(
        kind: RelationshipType,
        person1_id: impl Into<String>,
        person2_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            kind,
            person1_id: person1_id.into(),
            person2_id: person2_id.into(),
            start_date: None,
            end_date: None,
            metadata: None,
        }
    }

    pub fn parent_child(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self::new(RelationshipType::ParentChild, parent_id, child_id)
    }

    pub fn spouse(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(RelationshipType::Spouse, a, b)
    }

    pub fn sibling(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(RelationshipType::Sibling, a, b)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Typed endpoints of the draft
    ///
    /// # Errors
    /// * `SelfRelationship` - if both endpoints are the same person
    pub fn link(&self) -> Result<Link> {
        Link::from_parts(self.kind, self.person1_id.as_str(), self.person2_id.as_str())
    }

    /// Materialise the draft, allocating a UUID v7 id when none was given
    ///
    /// # Errors
    /// * `SelfRelationship` - if both endpoints are the same person
    pub fn into_relationship(self) -> Result<Relationship> {
        let link = self.link()?;
        let id = self.id.unwrap_or_else(|| Uuid::now_v7().to_string());
        Ok(Relationship {
            id,
            link,
            start_date: self.start_date,
            end_date: self.end_date,
            metadata: self.metadata,
            created_at: Utc::now(),
        })
    }
}
