use std::collections::HashSet;

use super::TreeLayout;

/// Depth at or above which no generation is filtered out
pub const UNBOUNDED_DEPTH: u32 = 10;

/// Restrict a layout to a window of generations around `focus_id`
///
/// Keeps nodes whose generation lies in
/// `[focus - floor(depth/2), focus + ceil(depth/2)]` and edges whose
/// endpoints both survive. Positions are not recomputed. A depth of
/// [`UNBOUNDED_DEPTH`] or more, or an unknown focus, returns the layout
/// unchanged.
pub fn filter_by_depth(layout: &TreeLayout, focus_id: &str, max_depth: u32) -> TreeLayout {
    if max_depth >= UNBOUNDED_DEPTH {
        return layout.clone();
    }

    let Some(focus) = layout.node(focus_id) else {
        tracing::debug!(focus_id, "focus person not in layout, returning it unfiltered");
        return layout.clone();
    };

    let below = i64::from(max_depth / 2);
    let above = i64::from(max_depth.div_ceil(2));
    let focus_generation = i64::from(focus.generation);
    let min_generation = focus_generation - below;
    let max_generation = focus_generation + above;

    let nodes: Vec<_> = layout
        .nodes
        .iter()
        .filter(|n| (min_generation..=max_generation).contains(&i64::from(n.generation)))
        .cloned()
        .collect();

    let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = layout
        .edges
        .iter()
        .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
        .cloned()
        .collect();

    TreeLayout { nodes, edges }
}
