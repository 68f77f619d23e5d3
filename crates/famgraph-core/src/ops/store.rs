use chrono::{NaiveDate, Utc};
use std::time::Instant;

use crate::errors::{FamilyError, Result};
use crate::model::{Metadata, Person, Relationship, RelationshipDraft};
use crate::rules::validation::{validate_person, validate_relationship};
use crate::snapshot::FamilySnapshot;
use crate::{log_op_end, log_op_error, log_op_start};

/// Persistence seam the engine reads from and gates writes into
///
/// Implementations own the records. The engine only sees the
/// [`FamilySnapshot`] returned by [`EntityStore::snapshot`].
pub trait EntityStore {
    fn list_persons(&self) -> Vec<Person>;

    fn list_relationships(&self) -> Vec<Relationship>;

    /// Validate `draft` against the current records and store it
    ///
    /// # Errors
    /// * `SelfRelationship` / `MissingEndpoint` - structurally invalid draft
    /// * `ValidationRejected` - the consistency checks refused the edge
    /// * `ConfirmationRequired` - a warning was raised and `confirm_warning`
    ///   is false
    fn create_relationship(
        &mut self,
        draft: RelationshipDraft,
        confirm_warning: bool,
    ) -> Result<Relationship>;

    /// Remove a person together with every relationship touching them
    ///
    /// # Errors
    /// * `PersonNotFound` - if no person has this id
    fn delete_person(&mut self, person_id: &str) -> Result<Person>;

    fn snapshot(&self) -> FamilySnapshot {
        FamilySnapshot::new(self.list_persons(), self.list_relationships())
    }
}

/// Role of a person added through [`MemoryStore::quick_add`], relative to
/// the existing person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAddRole {
    Parent,
    Child,
    Spouse { marriage_date: Option<NaiveDate> },
    Sibling,
}

/// In-memory entity store
///
/// Records are kept in insertion order so snapshots, and therefore layouts,
/// are deterministic. Not thread-safe; wrap it if shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    persons: Vec<Person>,
    relationships: Vec<Relationship>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records without validation, for fixtures and imports
    pub fn from_parts(persons: Vec<Person>, relationships: Vec<Relationship>) -> Self {
        Self {
            persons,
            relationships,
        }
    }

    /// Insert a person as-is
    ///
    /// # Errors
    /// * `PersonAlreadyExists` - if the id is taken
    pub fn insert_person(&mut self, person: Person) -> Result<()> {
        if self.contains_person(&person.id) {
            return Err(FamilyError::PersonAlreadyExists {
                person_id: person.id,
            });
        }
        self.persons.push(person);
        Ok(())
    }

    /// Validate then insert a person
    ///
    /// # Errors
    /// * `InvalidPerson` - if a field check fails
    /// * `PersonAlreadyExists` - if the id is taken
    pub fn create_person(&mut self, person: Person, today: NaiveDate) -> Result<()> {
        log_op_start!("create_person", person_id = %person.id);
        let start = Instant::now();

        let person_id = person.id.clone();
        let result = validate_person(&person, today).and_then(|()| self.insert_person(person));

        match &result {
            Ok(()) => {
                log_op_end!(
                    "create_person",
                    duration_ms = start.elapsed().as_millis() as u64,
                    person_id = %person_id
                );
            }
            Err(e) => {
                log_op_error!(
                    "create_person",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }

        result
    }

    /// # Errors
    /// * `PersonNotFound` - if no person has this id
    pub fn get_person(&self, person_id: &str) -> Result<&Person> {
        self.persons
            .iter()
            .find(|p| p.id == person_id)
            .ok_or_else(|| FamilyError::PersonNotFound {
                person_id: person_id.to_string(),
            })
    }

    pub fn contains_person(&self, person_id: &str) -> bool {
        self.persons.iter().any(|p| p.id == person_id)
    }

    /// Replace a person's fields in place
    ///
    /// `created_at` is kept from the stored record and `updated_at` is set
    /// to now.
    ///
    /// # Errors
    /// * `InvalidPerson` - if a field check fails
    /// * `PersonNotFound` - if no person has this id
    pub fn update_person(&mut self, mut person: Person, today: NaiveDate) -> Result<()> {
        validate_person(&person, today)?;

        let stored = self
            .persons
            .iter_mut()
            .find(|p| p.id == person.id)
            .ok_or_else(|| FamilyError::PersonNotFound {
                person_id: person.id.clone(),
            })?;

        person.created_at = stored.created_at;
        person.updated_at = Utc::now();
        *stored = person;
        Ok(())
    }

    /// # Errors
    /// * `RelationshipNotFound` - if no relationship has this id
    pub fn get_relationship(&self, relationship_id: &str) -> Result<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.id == relationship_id)
            .ok_or_else(|| FamilyError::RelationshipNotFound {
                relationship_id: relationship_id.to_string(),
            })
    }

    /// Change the dates and metadata of a stored relationship
    ///
    /// Endpoints and type are fixed once stored.
    ///
    /// # Errors
    /// * `RelationshipNotFound` - if no relationship has this id
    pub fn update_relationship_details(
        &mut self,
        relationship_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        let rel = self
            .relationships
            .iter_mut()
            .find(|r| r.id == relationship_id)
            .ok_or_else(|| FamilyError::RelationshipNotFound {
                relationship_id: relationship_id.to_string(),
            })?;

        rel.start_date = start_date;
        rel.end_date = end_date;
        rel.metadata = metadata;
        Ok(())
    }

    /// # Errors
    /// * `RelationshipNotFound` - if no relationship has this id
    pub fn delete_relationship(&mut self, relationship_id: &str) -> Result<Relationship> {
        let index = self
            .relationships
            .iter()
            .position(|r| r.id == relationship_id)
            .ok_or_else(|| FamilyError::RelationshipNotFound {
                relationship_id: relationship_id.to_string(),
            })?;
        Ok(self.relationships.remove(index))
    }

    /// Add a new person already related to `base_id`
    ///
    /// The person and the relationship are stored together or not at all.
    ///
    /// # Errors
    /// * `PersonNotFound` - if `base_id` is unknown
    /// * `PersonAlreadyExists` / `InvalidPerson` - the new person is refused
    /// * any error of [`EntityStore::create_relationship`]
    pub fn quick_add(
        &mut self,
        base_id: &str,
        role: QuickAddRole,
        person: Person,
        today: NaiveDate,
        confirm_warning: bool,
    ) -> Result<Relationship> {
        log_op_start!("quick_add", person_id = %base_id, role = ?role);
        let start = Instant::now();

        let result = self.quick_add_impl(base_id, role, person, today, confirm_warning);

        match &result {
            Ok(rel) => {
                log_op_end!(
                    "quick_add",
                    duration_ms = start.elapsed().as_millis() as u64,
                    relationship_id = %rel.id
                );
            }
            Err(e) => {
                log_op_error!(
                    "quick_add",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }

        result
    }

    fn quick_add_impl(
        &mut self,
        base_id: &str,
        role: QuickAddRole,
        person: Person,
        today: NaiveDate,
        confirm_warning: bool,
    ) -> Result<Relationship> {
        self.get_person(base_id)?;
        validate_person(&person, today)?;
        if self.contains_person(&person.id) {
            return Err(FamilyError::PersonAlreadyExists {
                person_id: person.id,
            });
        }

        let new_id = person.id.clone();
        let draft = match role {
            QuickAddRole::Parent => RelationshipDraft::parent_child(new_id, base_id),
            QuickAddRole::Child => RelationshipDraft::parent_child(base_id, new_id),
            QuickAddRole::Spouse { marriage_date } => {
                let draft = RelationshipDraft::spouse(base_id, new_id);
                match marriage_date {
                    Some(date) => draft.with_start_date(date),
                    None => draft,
                }
            }
            QuickAddRole::Sibling => RelationshipDraft::sibling(base_id, new_id),
        };

        // Work on a copy so a refused edge leaves no orphan person behind.
        let mut staged = self.clone();
        staged.persons.push(person);
        let rel = staged.create_relationship(draft, confirm_warning)?;

        *self = staged;
        Ok(rel)
    }
}

impl EntityStore for MemoryStore {
    fn list_persons(&self) -> Vec<Person> {
        self.persons.clone()
    }

    fn list_relationships(&self) -> Vec<Relationship> {
        self.relationships.clone()
    }

    fn create_relationship(
        &mut self,
        draft: RelationshipDraft,
        confirm_warning: bool,
    ) -> Result<Relationship> {
        if let Some(id) = &draft.id {
            if self.relationships.iter().any(|r| &r.id == id) {
                return Err(FamilyError::InvalidInput {
                    reason: format!("relationship id '{}' is already in use", id),
                });
            }
        }

        let snapshot = FamilySnapshot::new(self.persons.clone(), self.relationships.clone());
        validate_relationship(&snapshot, &draft)?.into_result(confirm_warning)?;

        let rel = draft.into_relationship()?;
        self.relationships.push(rel.clone());
        Ok(rel)
    }

    fn delete_person(&mut self, person_id: &str) -> Result<Person> {
        log_op_start!("delete_person", person_id = %person_id);
        let start = Instant::now();

        let Some(index) = self.persons.iter().position(|p| p.id == person_id) else {
            let err = FamilyError::PersonNotFound {
                person_id: person_id.to_string(),
            };
            log_op_error!(
                "delete_person",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(err);
        };

        let before = self.relationships.len();
        self.relationships.retain(|r| !r.involves(person_id));
        let removed_edges = before - self.relationships.len();
        let person = self.persons.remove(index);

        log_op_end!(
            "delete_person",
            duration_ms = start.elapsed().as_millis() as u64,
            relationship_count = removed_edges as u64
        );

        Ok(person)
    }

    fn snapshot(&self) -> FamilySnapshot {
        FamilySnapshot::new(self.persons.clone(), self.relationships.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn store_with(ids: &[&str]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for id in ids {
            store.insert_person(Person::new(*id, *id)).unwrap();
        }
        store
    }

    #[test]
    fn test_insert_duplicate_person_fails() {
        let mut store = store_with(&["a"]);
        let result = store.insert_person(Person::new("a", "Again"));
        assert!(matches!(result, Err(FamilyError::PersonAlreadyExists { .. })));
    }

    #[test]
    fn test_create_relationship_rejects_loop() {
        let mut store = store_with(&["a", "b"]);
        store
            .create_relationship(RelationshipDraft::parent_child("a", "b"), false)
            .unwrap();

        let result = store.create_relationship(RelationshipDraft::parent_child("b", "a"), false);
        assert!(matches!(result, Err(FamilyError::ValidationRejected { .. })));
        assert_eq!(store.list_relationships().len(), 1);
    }

    #[test]
    fn test_warning_needs_confirmation() {
        let mut store = MemoryStore::new();
        let mut old = Person::new("old", "Old");
        old.date_of_birth = NaiveDate::from_ymd_opt(1900, 1, 1);
        let mut young = Person::new("young", "Young");
        young.date_of_birth = NaiveDate::from_ymd_opt(1990, 1, 1);
        store.insert_person(old).unwrap();
        store.insert_person(young).unwrap();

        let draft = RelationshipDraft::parent_child("old", "young");
        let result = store.create_relationship(draft.clone(), false);
        assert!(matches!(result, Err(FamilyError::ConfirmationRequired { .. })));

        assert!(store.create_relationship(draft, true).is_ok());
    }

    #[test]
    fn test_delete_person_cascades() {
        let mut store = store_with(&["a", "b", "c"]);
        store
            .create_relationship(RelationshipDraft::parent_child("a", "b"), false)
            .unwrap();
        store
            .create_relationship(RelationshipDraft::spouse("a", "c"), false)
            .unwrap();
        store
            .create_relationship(RelationshipDraft::sibling("b", "c"), false)
            .unwrap();

        store.delete_person("a").unwrap();

        let remaining = store.list_relationships();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind(), RelationshipType::Sibling);
        assert!(store.get_person("a").is_err());
    }

    #[test]
    fn test_quick_add_is_atomic() {
        let mut store = store_with(&["base"]);
        let mut parent = Person::new("young-parent", "Young");
        parent.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 1);
        store.persons[0].date_of_birth = NaiveDate::from_ymd_opt(2005, 1, 1);

        let result = store.quick_add("base", QuickAddRole::Parent, parent, today(), false);
        assert!(result.is_err());
        assert!(!store.contains_person("young-parent"));
        assert!(store.list_relationships().is_empty());
    }

    #[test]
    fn test_quick_add_child_creates_edge() {
        let mut store = store_with(&["base"]);
        let rel = store
            .quick_add("base", QuickAddRole::Child, Person::new("kid", "Kid"), today(), false)
            .unwrap();

        assert_eq!(rel.link.endpoints(), ("base", "kid"));
        assert!(store.contains_person("kid"));
    }

    #[test]
    fn test_update_person_keeps_created_at() {
        let mut store = store_with(&["a"]);
        let created = store.get_person("a").unwrap().created_at;

        let mut edited = Person::new("a", "Renamed");
        edited.last_name = Some("Smith".to_string());
        store.update_person(edited, today()).unwrap();

        let stored = store.get_person("a").unwrap();
        assert_eq!(stored.full_name(), "Renamed Smith");
        assert_eq!(stored.created_at, created);
    }
}
