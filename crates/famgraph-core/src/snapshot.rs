//! Caller-owned view of the family graph
//!
//! Every engine function takes a [`FamilySnapshot`] and derives its answer
//! from it alone. The snapshot is immutable once built.

use std::collections::HashMap;

use crate::model::{Person, Relationship};

/// Immutable set of persons and relationship edges
///
/// Persons keep the order they were supplied in. When two persons share an
/// id the first one wins and the later one is dropped.
#[derive(Debug, Clone, Default)]
pub struct FamilySnapshot {
    persons: Vec<Person>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl FamilySnapshot {
    pub fn new(persons: Vec<Person>, relationships: Vec<Relationship>) -> Self {
        let mut kept = Vec::with_capacity(persons.len());
        let mut index = HashMap::with_capacity(persons.len());

        for person in persons {
            if index.contains_key(&person.id) {
                tracing::debug!(person_id = %person.id, "duplicate person id in snapshot, keeping first");
                continue;
            }
            index.insert(person.id.clone(), kept.len());
            kept.push(person);
        }

        Self {
            persons: kept,
            index,
            relationships,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Persons in input order
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.index.get(id).map(|&i| &self.persons[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of persons
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn person_ids(&self) -> impl Iterator<Item = &str> {
        self.persons.iter().map(|p| p.id.as_str())
    }
}
