#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{alice_family, chain, parent_child, person};
use famgraph_core::layout::{
    apply_positions, build_graph, filter_by_depth, layout_tree, EdgeKind, LayoutConfig,
    LayoutDirection, Position, UNBOUNDED_DEPTH,
};
use famgraph_core::traversal::generation::compute_generations;
use famgraph_core::FamilySnapshot;

#[test]
fn test_layout_is_deterministic() {
    let snapshot = alice_family();
    let config = LayoutConfig::default();

    let first = layout_tree(&snapshot, None, LayoutDirection::Vertical, &config);
    let second = layout_tree(&snapshot, None, LayoutDirection::Vertical, &config);

    assert_eq!(first, second);
}

#[test]
fn test_children_are_placed_left_to_right_in_birth_order() {
    // GIVEN three children with explicit birth order, listed out of order
    let mut c1 = person("c1");
    c1.birth_order = Some(1);
    let mut c2 = person("c2");
    c2.birth_order = Some(2);
    let mut c3 = person("c3");
    c3.birth_order = Some(3);

    let snapshot = FamilySnapshot::new(
        vec![person("p"), c1, c2, c3],
        vec![
            parent_child("r3", "p", "c3"),
            parent_child("r1", "p", "c1"),
            parent_child("r2", "p", "c2"),
        ],
    );

    // WHEN laid out vertically
    let layout = layout_tree(
        &snapshot,
        Some("p"),
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    // THEN the row is centred with 250 between neighbours
    let x = |id: &str| layout.node(id).unwrap().position.x;
    assert_eq!(x("c1"), -250.0);
    assert_eq!(x("c2"), 0.0);
    assert_eq!(x("c3"), 250.0);
    assert_eq!(layout.node("p").unwrap().child_ids, vec!["c1", "c2", "c3"]);
}

#[test]
fn test_nodes_are_grouped_by_generation() {
    let snapshot = chain(3);

    let layout = layout_tree(
        &snapshot,
        Some("p0"),
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    let generations: Vec<i32> = layout.nodes.iter().map(|n| n.generation).collect();
    assert_eq!(generations, vec![0, 1, 2]);
}

#[test]
fn test_custom_spacing_and_horizontal_direction() {
    let snapshot = chain(2);
    let generations = compute_generations(&snapshot, None);
    let mut layout = build_graph(&snapshot, &generations);

    let config = LayoutConfig {
        node_spacing: 100.0,
        generation_spacing: 50.0,
    };
    apply_positions(&mut layout, LayoutDirection::Horizontal, &config);

    assert_eq!(
        layout.node("p1").unwrap().position,
        Position { x: 50.0, y: 0.0 }
    );
}

#[test]
fn test_unreached_persons_default_to_generation_zero() {
    let snapshot = FamilySnapshot::new(
        vec![person("a"), person("b"), person("loner")],
        vec![parent_child("r1", "a", "b")],
    );

    let layout = layout_tree(
        &snapshot,
        Some("a"),
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    assert_eq!(layout.node("loner").unwrap().generation, 0);
    assert_eq!(layout.nodes.len(), 3);
}

#[test]
fn test_edge_kinds() {
    let layout = layout_tree(
        &alice_family(),
        None,
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    let spouse_edges = layout
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Spouse)
        .count();
    assert_eq!(spouse_edges, 2);
}

#[test]
fn test_depth_filter_drops_edges_with_one_endpoint_outside() {
    // GIVEN a five generation chain
    let snapshot = chain(5);
    let layout = layout_tree(
        &snapshot,
        Some("p0"),
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    // WHEN focusing on p2 with depth 2 (window [1, 3])
    let view = filter_by_depth(&layout, "p2", 2);

    // THEN only the edges inside the window survive
    let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    let edges: Vec<&str> = view.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edges, vec!["p1-p2", "p2-p3"]);

    // AND the full layout is untouched
    assert_eq!(layout.nodes.len(), 5);
}

#[test]
fn test_depth_ten_shows_every_generation_of_a_deep_tree() {
    // GIVEN a fourteen-generation line
    let snapshot = chain(14);
    let layout = layout_tree(
        &snapshot,
        None,
        LayoutDirection::Vertical,
        &LayoutConfig::default(),
    );

    // WHEN viewed from the top at the widest depth setting
    let view = filter_by_depth(&layout, "p0", UNBOUNDED_DEPTH);

    // THEN nothing is cut
    assert_eq!(view.nodes.len(), 14);
    assert_eq!(view, layout);

    // AND one step narrower still applies the window
    let narrowed = filter_by_depth(&layout, "p0", UNBOUNDED_DEPTH - 1);
    assert_eq!(narrowed.nodes.len(), 6);
}
