pub mod family_group;
pub mod metadata;
pub mod person;
pub mod relationship;

pub use family_group::FamilyGroup;
pub use metadata::Metadata;
pub use person::{Gender, Person};
pub use relationship::{Link, PersonPair, Relationship, RelationshipDraft, RelationshipType};
pub(crate) use relationship::RelationshipRecord;
