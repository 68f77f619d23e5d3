#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{chain, parent_child, person};
use famgraph_core::layout::{
    filter_by_depth, layout_tree, LayoutConfig, LayoutDirection, UNBOUNDED_DEPTH,
};
use famgraph_core::queries::kinship::{children_of, is_ancestor, parents_of};
use famgraph_core::traversal::generation::compute_generations;
use famgraph_core::{FamilySnapshot, Person, Relationship};
use proptest::prelude::*;

/// Random acyclic family: edges only run from lower to higher index
fn dag_strategy() -> impl Strategy<Value = FamilySnapshot> {
    (2usize..12)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..(n * 2))))
        .prop_map(|(n, pairs)| {
            let persons = (0..n).map(|i| person(&format!("p{}", i))).collect();
            let relationships: Vec<Relationship> = pairs
                .into_iter()
                .filter(|(a, b)| a < b)
                .enumerate()
                .map(|(k, (a, b))| {
                    parent_child(&format!("r{}", k), &format!("p{}", a), &format!("p{}", b))
                })
                .collect();
            FamilySnapshot::new(persons, relationships)
        })
}

proptest! {
    #[test]
    fn prop_chain_ancestry_runs_one_way(len in 2usize..30, i in 0usize..30, j in 0usize..30) {
        let i = i % len;
        let j = j % len;
        let snapshot = chain(len);
        let a = format!("p{}", i);
        let b = format!("p{}", j);

        prop_assert_eq!(is_ancestor(&snapshot, &a, &b), i <= j);
    }

    #[test]
    fn prop_no_mutual_ancestry_without_identity(snapshot in dag_strategy()) {
        let ids: Vec<String> = snapshot.person_ids().map(str::to_string).collect();
        for x in &ids {
            for y in &ids {
                if is_ancestor(&snapshot, x, y) && is_ancestor(&snapshot, y, x) {
                    prop_assert_eq!(x, y);
                }
            }
        }
    }

    #[test]
    fn prop_nobody_is_their_own_parent_or_child(snapshot in dag_strategy()) {
        for p in snapshot.persons() {
            prop_assert!(children_of(&snapshot, &p.id).iter().all(|c| c.id != p.id));
            prop_assert!(parents_of(&snapshot, &p.id).iter().all(|c| c.id != p.id));
        }
    }

    #[test]
    fn prop_generations_are_deterministic(snapshot in dag_strategy()) {
        prop_assert_eq!(
            compute_generations(&snapshot, None),
            compute_generations(&snapshot, None)
        );
    }

    #[test]
    fn prop_children_are_one_generation_below_some_parent(snapshot in dag_strategy()) {
        let generations = compute_generations(&snapshot, None);
        for p in snapshot.persons() {
            let parents = parents_of(&snapshot, &p.id);
            if parents.is_empty() {
                prop_assert_eq!(generations[&p.id], 0);
            } else {
                let best = parents.iter().map(|q| generations[&q.id] + 1).min().unwrap();
                prop_assert_eq!(generations[&p.id], best);
            }
        }
    }

    #[test]
    fn prop_wide_depth_filter_is_identity(snapshot in dag_strategy(), focus in 0usize..12) {
        let layout = layout_tree(&snapshot, None, LayoutDirection::Vertical, &LayoutConfig::default());
        let focus = format!("p{}", focus % snapshot.len());

        let view = filter_by_depth(&layout, &focus, UNBOUNDED_DEPTH);

        prop_assert_eq!(view, layout);
    }

    #[test]
    fn prop_children_order_respects_birth_order(orders in prop::collection::vec(prop::option::of(1u32..6), 1..8)) {
        let mut persons = vec![person("parent")];
        let mut relationships = Vec::new();
        for (i, order) in orders.iter().enumerate() {
            let mut child = Person::new(format!("c{}", i), "Child");
            child.birth_order = *order;
            persons.push(child);
            relationships.push(parent_child(&format!("r{}", i), "parent", &format!("c{}", i)));
        }
        let snapshot = FamilySnapshot::new(persons, relationships);

        let children = children_of(&snapshot, "parent");
        prop_assert_eq!(children.len(), orders.len());

        // Ordered entries first, ascending; then the rest
        let keys: Vec<Option<u32>> = children.iter().map(|c| c.birth_order).collect();
        let first_none = keys.iter().position(Option::is_none).unwrap_or(keys.len());
        prop_assert!(keys[first_none..].iter().all(Option::is_none));
        prop_assert!(keys[..first_none].windows(2).all(|w| w[0] <= w[1]));
    }
}
