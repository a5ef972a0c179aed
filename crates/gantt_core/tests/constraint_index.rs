use gantt_core::{ConstraintEdge, ConstraintIndex, ConstraintKind, TaskId, TaskTree};
use proptest::prelude::*;
use std::collections::BTreeSet;

const TASK_COUNT: usize = 6;

fn tasks(count: usize) -> Vec<TaskId> {
    let mut tree = TaskTree::new();
    (0..count).map(|i| tree.insert(None, i).unwrap()).collect()
}

#[test]
fn add_then_remove_round_trips_membership() {
    let ids = tasks(2);
    let (a, b) = (ids[0], ids[1]);
    let mut index = ConstraintIndex::new();

    assert!(index.add_constraint(a, b, ConstraintKind::Hard));
    assert!(index.has_constraint(a, b, ConstraintKind::Hard));
    assert!(!index.has_constraint(a, b, ConstraintKind::Soft));
    assert!(!index.has_constraint(b, a, ConstraintKind::Hard));

    assert!(index.remove_constraint(a, b, ConstraintKind::Hard));
    assert!(!index.has_constraint(a, b, ConstraintKind::Hard));
    assert!(!index.remove_constraint(a, b, ConstraintKind::Hard));
    assert!(index.is_empty());
}

#[test]
fn add_is_idempotent() {
    let ids = tasks(2);
    let mut index = ConstraintIndex::new();

    assert!(index.add_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(!index.add_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(index.has_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert_eq!(index.len(), 1);
}

#[test]
fn toggle_twice_leaves_edge_absent() {
    let ids = tasks(2);
    let mut index = ConstraintIndex::new();

    assert!(index.toggle_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(!index.toggle_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(!index.has_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(index.constraints_for_task(ids[0]).is_empty());
}

#[test]
fn self_loops_are_refused() {
    let ids = tasks(1);
    let mut index = ConstraintIndex::new();

    assert!(!index.add_constraint(ids[0], ids[0], ConstraintKind::Soft));
    assert!(!index.toggle_constraint(ids[0], ids[0], ConstraintKind::Soft));
    assert!(index.is_empty());
}

#[test]
fn same_endpoints_with_different_kinds_are_distinct() {
    let ids = tasks(2);
    let mut index = ConstraintIndex::new();

    index.add_constraint(ids[0], ids[1], ConstraintKind::Hard);
    index.add_constraint(ids[0], ids[1], ConstraintKind::Soft);
    assert_eq!(index.len(), 2);
    assert_eq!(index.constraints_for_task(ids[1]).len(), 2);
}

#[test]
fn cycles_are_allowed() {
    let ids = tasks(3);
    let mut index = ConstraintIndex::new();

    assert!(index.add_constraint(ids[0], ids[1], ConstraintKind::Hard));
    assert!(index.add_constraint(ids[1], ids[2], ConstraintKind::Hard));
    assert!(index.add_constraint(ids[2], ids[0], ConstraintKind::Hard));
    assert_eq!(index.len(), 3);
}

#[test]
fn removing_a_task_does_not_cascade_into_edges() {
    let mut tree = TaskTree::new();
    let a = tree.insert(None, 0).unwrap();
    let b = tree.insert(None, 1).unwrap();
    let mut index = ConstraintIndex::new();
    index.add_constraint(a, b, ConstraintKind::Hard);

    tree.remove(b).unwrap();
    assert!(index.has_constraint(a, b, ConstraintKind::Hard));

    let purged = index.remove_constraints_for_task(b);
    assert_eq!(purged, vec![ConstraintEdge::new(a, b, ConstraintKind::Hard)]);
    assert!(index.constraints_for_task(a).is_empty());
}

#[test]
fn edges_survive_tree_moves() {
    let mut tree = TaskTree::new();
    let a = tree.insert(None, 0).unwrap();
    let b = tree.insert(None, 1).unwrap();
    let mut index = ConstraintIndex::new();
    index.add_constraint(a, b, ConstraintKind::Soft);

    tree.move_node(b, Some(a), 0).unwrap();
    assert!(index.has_constraint(a, b, ConstraintKind::Soft));
}

#[test]
fn clear_empties_both_indexes() {
    let ids = tasks(2);
    let mut index = ConstraintIndex::new();
    index.add_constraint(ids[0], ids[1], ConstraintKind::Hard);

    index.clear();
    assert!(index.is_empty());
    assert!(index.constraints_for_task(ids[0]).is_empty());
    assert_eq!((&index).into_iter().count(), 0);
}

/// `(from, to, kind)` as indexes into a `tasks(TASK_COUNT)` list.
fn edge_strategy() -> impl Strategy<Value = (usize, usize, ConstraintKind)> {
    let kind = prop_oneof![Just(ConstraintKind::Hard), Just(ConstraintKind::Soft)];
    (0..TASK_COUNT, 0..TASK_COUNT, kind)
}

fn resolve(ids: &[TaskId], edge: (usize, usize, ConstraintKind)) -> ConstraintEdge {
    ConstraintEdge::new(ids[edge.0], ids[edge.1], edge.2)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn membership_follows_add_and_remove(
        background in prop::collection::vec(edge_strategy(), 0..16),
        target in edge_strategy().prop_filter("edges cannot be self-loops", |(from, to, _)| from != to),
    ) {
        let ids = tasks(TASK_COUNT);
        let mut index = ConstraintIndex::new();
        for edge in &background {
            let edge = resolve(&ids, *edge);
            index.add_constraint(edge.from, edge.to, edge.kind);
        }
        let edge = resolve(&ids, target);
        let untouched: Vec<ConstraintEdge> =
            index.iter().copied().filter(|other| *other != edge).collect();

        index.add_constraint(edge.from, edge.to, edge.kind);
        prop_assert!(index.has_constraint(edge.from, edge.to, edge.kind));
        prop_assert!(index.constraints_for_task(edge.to).contains(&edge));

        prop_assert!(index.remove_constraint(edge.from, edge.to, edge.kind));
        prop_assert!(!index.has_constraint(edge.from, edge.to, edge.kind));
        prop_assert!(!index.constraints_for_task(edge.from).contains(&edge));
        prop_assert_eq!(index.iter().copied().collect::<Vec<_>>(), untouched);
    }

    #[test]
    fn constraints_for_task_is_exact_for_any_insertion_order(
        (edges, shuffled) in prop::collection::vec(edge_strategy(), 0..24)
            .prop_flat_map(|edges| (Just(edges.clone()), Just(edges).prop_shuffle())),
    ) {
        let ids = tasks(TASK_COUNT);
        let mut forward = ConstraintIndex::new();
        let mut reordered = ConstraintIndex::new();
        for edge in &edges {
            let edge = resolve(&ids, *edge);
            forward.add_constraint(edge.from, edge.to, edge.kind);
        }
        for edge in &shuffled {
            let edge = resolve(&ids, *edge);
            reordered.add_constraint(edge.from, edge.to, edge.kind);
        }

        let stored: BTreeSet<ConstraintEdge> = edges
            .iter()
            .map(|edge| resolve(&ids, *edge))
            .filter(|edge| !edge.is_self_loop())
            .collect();
        prop_assert_eq!(forward.len(), stored.len());
        for id in &ids {
            let expected: Vec<ConstraintEdge> = stored
                .iter()
                .copied()
                .filter(|edge| edge.from == *id || edge.to == *id)
                .collect();
            prop_assert_eq!(&forward.constraints_for_task(*id), &expected);
            prop_assert_eq!(&reordered.constraints_for_task(*id), &expected);
        }
    }
}
