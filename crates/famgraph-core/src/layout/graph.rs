use std::collections::BTreeMap;
use std::time::Instant;

use super::{DisplayEdge, EdgeKind, LayoutConfig, LayoutDirection, Position, TreeLayout, TreeNode};
use crate::model::{Link, Person};
use crate::queries::kinship::{children_of, parents_of, spouses_of};
use crate::snapshot::FamilySnapshot;
use crate::traversal::generation::{compute_generations, GenerationMap};
use crate::{log_op_end, log_op_start};

/// Lay out the whole snapshot
///
/// Computes generations from `root_id` (or from all parentless persons),
/// materialises nodes and edges, and positions them.
pub fn layout_tree(
    snapshot: &FamilySnapshot,
    root_id: Option<&str>,
    direction: LayoutDirection,
    config: &LayoutConfig,
) -> TreeLayout {
    log_op_start!("layout_tree", root_id = ?root_id, direction = ?direction);
    let start = Instant::now();

    let generations = compute_generations(snapshot, root_id);
    let mut layout = build_graph(snapshot, &generations);
    apply_positions(&mut layout, direction, config);

    log_op_end!(
        "layout_tree",
        duration_ms = start.elapsed().as_millis() as u64,
        node_count = layout.nodes.len() as u64,
        edge_count = layout.edges.len() as u64
    );

    layout
}

/// Materialise one node per person and one edge per drawable relationship
///
/// Nodes follow snapshot order; persons absent from `generations` get
/// generation 0. Parent-child edges become `"{parent}-{child}"`, spouse
/// edges `"spouse-{a}-{b}"`. Sibling, adopted and step edges are not drawn,
/// and edges touching a missing person are skipped. Positions are left at
/// the origin.
pub fn build_graph(snapshot: &FamilySnapshot, generations: &GenerationMap) -> TreeLayout {
    let nodes = snapshot
        .persons()
        .iter()
        .map(|person| TreeNode {
            id: person.id.clone(),
            person: person.clone(),
            generation: generations.get(&person.id).copied().unwrap_or(0),
            position: Position::default(),
            parent_ids: ids(parents_of(snapshot, &person.id)),
            child_ids: ids(children_of(snapshot, &person.id)),
            spouse_ids: ids(spouses_of(snapshot, &person.id)),
        })
        .collect();

    let mut edges = Vec::new();
    for rel in snapshot.relationships() {
        let (kind, id) = match &rel.link {
            Link::ParentChild {
                parent_id,
                child_id,
            } => (EdgeKind::ParentChild, format!("{}-{}", parent_id, child_id)),
            Link::Spouse(pair) => {
                let (a, b) = pair.ids();
                (EdgeKind::Spouse, format!("spouse-{}-{}", a, b))
            }
            Link::Sibling(_) | Link::Adopted { .. } | Link::Step { .. } => continue,
        };

        let (source, target) = rel.link.endpoints();
        if !snapshot.contains(source) || !snapshot.contains(target) {
            tracing::debug!(relationship_id = %rel.id, "skipping edge with missing endpoint");
            continue;
        }

        edges.push(DisplayEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
    }

    TreeLayout { nodes, edges }
}

/// Assign coordinates and group nodes by generation
///
/// Generations are laid out in ascending order. Within one generation nodes
/// keep their relative order and are centred on the origin:
/// `x = (i - n/2) * node_spacing + node_spacing/2`,
/// `y = generation * generation_spacing`. Horizontal layouts swap the axes.
pub fn apply_positions(layout: &mut TreeLayout, direction: LayoutDirection, config: &LayoutConfig) {
    let mut by_generation: BTreeMap<i32, Vec<TreeNode>> = BTreeMap::new();
    for node in layout.nodes.drain(..) {
        by_generation.entry(node.generation).or_default().push(node);
    }

    for (generation, mut row) in by_generation {
        let count = row.len() as f64;
        for (index, node) in row.iter_mut().enumerate() {
            let across = (index as f64 - count / 2.0) * config.node_spacing
                + config.node_spacing / 2.0;
            let down = f64::from(generation) * config.generation_spacing;

            node.position = match direction {
                LayoutDirection::Vertical => Position { x: across, y: down },
                LayoutDirection::Horizontal => Position { x: down, y: across },
            };
        }
        layout.nodes.extend(row);
    }
}

fn ids(persons: Vec<&Person>) -> Vec<String> {
    persons.into_iter().map(|p| p.id.clone()).collect()
}
