use std::collections::HashSet;

use crate::model::Link;
use crate::queries::kinship::is_ancestor;
use crate::snapshot::FamilySnapshot;

/// Find relationships with an endpoint missing from the snapshot
///
/// Returns list of (relationship_id, missing_person_id) tuples. An edge with
/// both endpoints missing is reported once per endpoint.
pub fn find_dangling_relationships(snapshot: &FamilySnapshot) -> Vec<(String, String)> {
    let mut dangling = Vec::new();

    for rel in snapshot.relationships() {
        let (a, b) = rel.link.endpoints();
        for id in [a, b] {
            if !snapshot.contains(id) {
                dangling.push((rel.id.clone(), id.to_string()));
            }
        }
    }

    dangling
}

/// Find persons that are their own ancestor through parent-child edges
///
/// Returns person ids in snapshot order.
pub fn find_parent_cycles(snapshot: &FamilySnapshot) -> Vec<String> {
    let mut parents_by_child: Vec<(&str, &str)> = Vec::new();
    for rel in snapshot.relationships() {
        if let Link::ParentChild {
            parent_id,
            child_id,
        } = &rel.link
        {
            parents_by_child.push((child_id.as_str(), parent_id.as_str()));
        }
    }

    let mut in_cycle = HashSet::new();
    for (child, parent) in parents_by_child {
        if snapshot.contains(child) && snapshot.contains(parent) && is_ancestor(snapshot, child, parent)
        {
            in_cycle.insert(child);
        }
    }

    snapshot
        .person_ids()
        .filter(|id| in_cycle.contains(id))
        .map(str::to_string)
        .collect()
}
