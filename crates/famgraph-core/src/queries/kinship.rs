//! Kinship derivation
//!
//! Read-only answers to "who are X's parents/children/spouses/siblings",
//! computed from the relationship edges of a [`FamilySnapshot`].
//!
//! Edges that point at a person absent from the snapshot are ignored, as are
//! self-links. Results never contain the queried person.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{Link, Person};
use crate::snapshot::FamilySnapshot;

/// Persons recorded as parents of `person_id`, in edge order
pub fn parents_of<'a>(snapshot: &'a FamilySnapshot, person_id: &str) -> Vec<&'a Person> {
    let ids = snapshot.relationships().iter().filter_map(|rel| match &rel.link {
        Link::ParentChild {
            parent_id,
            child_id,
        } if child_id == person_id => Some(parent_id.as_str()),
        _ => None,
    });
    resolve(snapshot, person_id, ids)
}

/// Persons recorded as children of `person_id`, in birth order
///
/// Ordering: children with a `birth_order` come first, ascending by that
/// value. The rest follow by date of birth ascending, with undated children
/// last. Remaining ties keep edge order.
pub fn children_of<'a>(snapshot: &'a FamilySnapshot, person_id: &str) -> Vec<&'a Person> {
    let ids = snapshot.relationships().iter().filter_map(|rel| match &rel.link {
        Link::ParentChild {
            parent_id,
            child_id,
        } if parent_id == person_id => Some(child_id.as_str()),
        _ => None,
    });
    let mut children = resolve(snapshot, person_id, ids);
    children.sort_by(|a, b| sibling_order(a, b));
    children
}

/// Persons joined to `person_id` by a spouse edge, in edge order
pub fn spouses_of<'a>(snapshot: &'a FamilySnapshot, person_id: &str) -> Vec<&'a Person> {
    let ids = snapshot.relationships().iter().filter_map(|rel| match &rel.link {
        Link::Spouse(pair) => pair.other(person_id),
        _ => None,
    });
    resolve(snapshot, person_id, ids)
}

/// Persons sharing at least one recorded parent with `person_id`
///
/// Walks each parent's children in birth order. Explicit sibling edges do
/// not contribute; see [`declared_siblings_of`].
pub fn siblings_of<'a>(snapshot: &'a FamilySnapshot, person_id: &str) -> Vec<&'a Person> {
    let mut seen = HashSet::new();
    let mut siblings = Vec::new();

    for parent in parents_of(snapshot, person_id) {
        for child in children_of(snapshot, &parent.id) {
            if child.id != person_id && seen.insert(child.id.as_str()) {
                siblings.push(child);
            }
        }
    }

    siblings
}

/// Persons joined to `person_id` by an explicit sibling edge
pub fn declared_siblings_of<'a>(snapshot: &'a FamilySnapshot, person_id: &str) -> Vec<&'a Person> {
    let ids = snapshot.relationships().iter().filter_map(|rel| match &rel.link {
        Link::Sibling(pair) => pair.other(person_id),
        _ => None,
    });
    resolve(snapshot, person_id, ids)
}

/// True when a sibling edge connects `a` and `b`, in either order
pub fn has_sibling_edge(snapshot: &FamilySnapshot, a: &str, b: &str) -> bool {
    snapshot
        .relationships()
        .iter()
        .any(|rel| matches!(&rel.link, Link::Sibling(pair) if pair.connects(a, b)))
}

/// True when `candidate_id` is `person_id` or one of its ancestors
///
/// Follows parent-child edges upward from `person_id`. Each person is
/// visited at most once, so cyclic data terminates with `false`.
pub fn is_ancestor(snapshot: &FamilySnapshot, candidate_id: &str, person_id: &str) -> bool {
    is_ancestor_excluding(snapshot, candidate_id, person_id, None)
}

/// [`is_ancestor`] over the edge set minus the relationship `excluded_id`
pub fn is_ancestor_excluding(
    snapshot: &FamilySnapshot,
    candidate_id: &str,
    person_id: &str,
    excluded_id: Option<&str>,
) -> bool {
    if candidate_id == person_id {
        return true;
    }

    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in snapshot.relationships() {
        if excluded_id == Some(rel.id.as_str()) {
            continue;
        }
        if let Link::ParentChild {
            parent_id,
            child_id,
        } = &rel.link
        {
            if snapshot.contains(parent_id) {
                parents
                    .entry(child_id.as_str())
                    .or_default()
                    .push(parent_id.as_str());
            }
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(person_id);
    let mut stack = vec![person_id];

    while let Some(current) = stack.pop() {
        let Some(direct) = parents.get(current) else {
            continue;
        };
        for &parent in direct {
            if parent == candidate_id {
                return true;
            }
            if visited.insert(parent) {
                stack.push(parent);
            }
        }
    }

    false
}

/// Comparator used to order children of one parent
fn sibling_order(a: &Person, b: &Person) -> Ordering {
    match (a.birth_order, b.birth_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a.date_of_birth, b.date_of_birth) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Look up ids in the snapshot, dropping self, missing persons and repeats
fn resolve<'a, 'i>(
    snapshot: &'a FamilySnapshot,
    person_id: &str,
    ids: impl Iterator<Item = &'i str>,
) -> Vec<&'a Person> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for id in ids {
        if id == person_id || !seen.insert(id) {
            continue;
        }
        match snapshot.person(id) {
            Some(person) => out.push(person),
            None => tracing::trace!(person_id = %id, "edge references missing person"),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Relationship;
    use chrono::NaiveDate;

    fn chain() -> FamilySnapshot {
        FamilySnapshot::new(
            vec![
                Person::new("a", "A"),
                Person::new("b", "B"),
                Person::new("c", "C"),
            ],
            vec![
                Relationship::parent_child("r1", "a", "b").unwrap(),
                Relationship::parent_child("r2", "b", "c").unwrap(),
            ],
        )
    }

    #[test]
    fn test_is_ancestor_chain() {
        let snapshot = chain();
        assert!(is_ancestor(&snapshot, "a", "c"));
        assert!(is_ancestor(&snapshot, "b", "c"));
        assert!(!is_ancestor(&snapshot, "c", "a"));
        assert!(is_ancestor(&snapshot, "c", "c"));
    }

    #[test]
    fn test_is_ancestor_excluding_edge() {
        let snapshot = chain();
        assert!(!is_ancestor_excluding(&snapshot, "a", "c", Some("r2")));
    }

    #[test]
    fn test_is_ancestor_terminates_on_cycle() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("x", "X"), Person::new("y", "Y"), Person::new("z", "Z")],
            vec![
                Relationship::parent_child("r1", "x", "y").unwrap(),
                Relationship::parent_child("r2", "y", "x").unwrap(),
            ],
        );
        assert!(is_ancestor(&snapshot, "x", "y"));
        assert!(!is_ancestor(&snapshot, "z", "y"));
    }

    #[test]
    fn test_children_ordering() {
        let mut first = Person::new("k1", "One");
        first.birth_order = Some(1);
        let mut second = Person::new("k2", "Two");
        second.birth_order = Some(2);
        let mut dated = Person::new("k3", "Dated");
        dated.date_of_birth = NaiveDate::from_ymd_opt(2010, 1, 1);
        let undated = Person::new("k4", "Undated");

        let snapshot = FamilySnapshot::new(
            vec![Person::new("p", "P"), undated, second, dated, first],
            vec![
                Relationship::parent_child("r4", "p", "k4").unwrap(),
                Relationship::parent_child("r2", "p", "k2").unwrap(),
                Relationship::parent_child("r3", "p", "k3").unwrap(),
                Relationship::parent_child("r1", "p", "k1").unwrap(),
            ],
        );

        let ids: Vec<&str> = children_of(&snapshot, "p")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["k1", "k2", "k3", "k4"]);
    }

    #[test]
    fn test_spouse_edge_is_symmetric() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("a", "A"), Person::new("b", "B")],
            vec![Relationship::spouse("s", "b", "a").unwrap()],
        );
        assert_eq!(spouses_of(&snapshot, "a")[0].id, "b");
        assert_eq!(spouses_of(&snapshot, "b")[0].id, "a");
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("kid", "Kid")],
            vec![Relationship::parent_child("r", "gone", "kid").unwrap()],
        );
        assert!(parents_of(&snapshot, "kid").is_empty());
        assert!(siblings_of(&snapshot, "kid").is_empty());
    }

    #[test]
    fn test_declared_siblings_do_not_feed_derived_siblings() {
        let snapshot = FamilySnapshot::new(
            vec![Person::new("a", "A"), Person::new("b", "B")],
            vec![Relationship::sibling("s", "a", "b").unwrap()],
        );
        assert!(siblings_of(&snapshot, "a").is_empty());
        assert_eq!(declared_siblings_of(&snapshot, "a")[0].id, "b");
        assert!(has_sibling_edge(&snapshot, "b", "a"));
    }
}
