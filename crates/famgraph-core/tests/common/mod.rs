use chrono::NaiveDate;
use famgraph_core::{FamilySnapshot, MemoryStore, Person, Relationship};

/// Create a person with only id and first name
#[allow(dead_code)]
pub fn person(id: &str) -> Person {
    let mut first = id.to_string();
    if let Some(c) = first.get_mut(0..1) {
        c.make_ascii_uppercase();
    }
    Person::new(id, first)
}

/// Create a person with a known date of birth
#[allow(dead_code)]
pub fn person_born(id: &str, year: i32, month: u32, day: u32) -> Person {
    let mut p = person(id);
    p.date_of_birth = NaiveDate::from_ymd_opt(year, month, day);
    p
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[allow(dead_code)]
pub fn parent_child(id: &str, parent: &str, child: &str) -> Relationship {
    Relationship::parent_child(id, parent, child).unwrap()
}

#[allow(dead_code)]
pub fn spouse(id: &str, a: &str, b: &str) -> Relationship {
    Relationship::spouse(id, a, b).unwrap()
}

#[allow(dead_code)]
pub fn sibling(id: &str, a: &str, b: &str) -> Relationship {
    Relationship::sibling(id, a, b).unwrap()
}

/// Alice and Bob, their only child Carol, and Carol's husband Dan
#[allow(dead_code)]
pub fn alice_family() -> FamilySnapshot {
    FamilySnapshot::new(
        vec![person("alice"), person("bob"), person("carol"), person("dan")],
        vec![
            parent_child("r1", "alice", "carol"),
            parent_child("r2", "bob", "carol"),
            spouse("r3", "alice", "bob"),
            spouse("r4", "carol", "dan"),
        ],
    )
}

/// Straight line of descent `p0 -> p1 -> ... -> p{len-1}`
#[allow(dead_code)]
pub fn chain(len: usize) -> FamilySnapshot {
    let persons = (0..len).map(|i| person(&format!("p{}", i))).collect();
    let relationships = (1..len)
        .map(|i| parent_child(&format!("r{}", i), &format!("p{}", i - 1), &format!("p{}", i)))
        .collect();
    FamilySnapshot::new(persons, relationships)
}

/// Store holding the same records as [`alice_family`]
#[allow(dead_code)]
pub fn alice_store() -> MemoryStore {
    let snapshot = alice_family();
    MemoryStore::from_parts(snapshot.persons().to_vec(), snapshot.relationships().to_vec())
}

/// Ids of a person list, in order
#[allow(dead_code)]
pub fn ids(persons: &[&Person]) -> Vec<String> {
    persons.iter().map(|p| p.id.clone()).collect()
}
