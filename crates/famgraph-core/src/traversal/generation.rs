use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Instant;

use crate::queries::kinship::{children_of, parents_of, spouses_of};
use crate::snapshot::FamilySnapshot;
use crate::{log_op_end, log_op_start};

/// Person id to generation number, ordered by id
pub type GenerationMap = BTreeMap<String, i32>;

/// Assign a generation number to every person reachable from the roots
///
/// With `root_id` the traversal starts from that person at generation 0.
/// Without it, or when it is not in the snapshot, every person with no
/// recorded parent is a root at generation 0.
///
/// Children are one generation below their parent. A person reached along
/// several paths keeps the smallest number seen. Spouses take their
/// partner's generation unless they already have one. Persons no root
/// reaches are absent from the map.
///
/// Each root is walked breadth-first with its own visited set, so every
/// person is reached first along its shortest path and cyclic data ends
/// the walk instead of recursing. Spouses are settled once the walk from
/// that root is complete.
pub fn compute_generations(snapshot: &FamilySnapshot, root_id: Option<&str>) -> GenerationMap {
    log_op_start!("compute_generations", root_id = ?root_id);
    let start = Instant::now();

    let roots = select_roots(snapshot, root_id);
    let mut generations = GenerationMap::new();

    for root in &roots {
        walk_from(snapshot, root, &mut generations);
    }

    log_op_end!(
        "compute_generations",
        duration_ms = start.elapsed().as_millis() as u64,
        root_count = roots.len() as u64,
        person_count = generations.len() as u64
    );

    generations
}

fn select_roots<'a>(snapshot: &'a FamilySnapshot, root_id: Option<&str>) -> Vec<&'a str> {
    if let Some(root_id) = root_id {
        if let Some(root) = snapshot.person(root_id) {
            return vec![root.id.as_str()];
        }
        tracing::warn!(root_id, "root person not in snapshot, using all parentless persons");
    }

    snapshot
        .persons()
        .iter()
        .filter(|p| parents_of(snapshot, &p.id).is_empty())
        .map(|p| p.id.as_str())
        .collect()
}

fn walk_from<'a>(snapshot: &'a FamilySnapshot, root: &'a str, generations: &mut GenerationMap) {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut reached: Vec<(&str, i32)> = Vec::new();
    let mut queue = VecDeque::from([(root, 0)]);
    visited.insert(root);

    while let Some((id, generation)) = queue.pop_front() {
        generations
            .entry(id.to_string())
            .and_modify(|g| *g = (*g).min(generation))
            .or_insert(generation);
        reached.push((id, generation));

        for child in children_of(snapshot, id) {
            if visited.insert(child.id.as_str()) {
                queue.push_back((child.id.as_str(), generation + 1));
            } else {
                tracing::trace!(person_id = %child.id, "already visited from this root");
            }
        }
    }

    for (id, generation) in reached {
        for spouse in spouses_of(snapshot, id) {
            generations.entry(spouse.id.clone()).or_insert(generation);
        }
    }
}
