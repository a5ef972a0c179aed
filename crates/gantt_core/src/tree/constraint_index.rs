//! Directed dependency edges between task identities.
//!
//! # Responsibility
//! - Store `ConstraintEdge`s and answer membership/endpoint queries.
//!
//! # Invariants
//! - No duplicate `(from, to, kind)` edge.
//! - The endpoint index holds exactly the edges of the primary set.
//! - Task existence is not checked; edges are weak references by id.
//! - Cycles are allowed.

use crate::model::constraint::{ConstraintEdge, ConstraintKind};
use crate::model::task::TaskId;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Set of dependency edges with a per-endpoint secondary index.
#[derive(Debug, Clone, Default)]
pub struct ConstraintIndex {
    edges: BTreeSet<ConstraintEdge>,
    by_task: BTreeMap<TaskId, BTreeSet<ConstraintEdge>>,
}

impl ConstraintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Adds `from -> to`. Returns `true` when a new edge was stored.
    ///
    /// Self-loops are refused; adding an existing edge leaves it in place.
    pub fn add_constraint(&mut self, from: TaskId, to: TaskId, kind: ConstraintKind) -> bool {
        let edge = ConstraintEdge::new(from, to, kind);
        if edge.is_self_loop() || !self.edges.insert(edge) {
            return false;
        }
        self.by_task.entry(from).or_default().insert(edge);
        self.by_task.entry(to).or_default().insert(edge);
        debug!("event=constraint_add module=constraints status=ok from={from} to={to} kind={kind:?}");
        true
    }

    /// Removes a matching edge. Returns whether one was present.
    pub fn remove_constraint(&mut self, from: TaskId, to: TaskId, kind: ConstraintKind) -> bool {
        let edge = ConstraintEdge::new(from, to, kind);
        if !self.edges.remove(&edge) {
            return false;
        }
        self.unindex(&edge);
        debug!(
            "event=constraint_remove module=constraints status=ok from={from} to={to} kind={kind:?}"
        );
        true
    }

    /// Adds the edge when absent, removes it when present.
    ///
    /// Returns whether the edge exists afterwards. Self-loops stay absent.
    pub fn toggle_constraint(&mut self, from: TaskId, to: TaskId, kind: ConstraintKind) -> bool {
        if self.has_constraint(from, to, kind) {
            self.remove_constraint(from, to, kind);
            false
        } else {
            self.add_constraint(from, to, kind)
        }
    }

    pub fn has_constraint(&self, from: TaskId, to: TaskId, kind: ConstraintKind) -> bool {
        self.edges.contains(&ConstraintEdge::new(from, to, kind))
    }

    /// Every edge with `id` as either endpoint, in edge order.
    pub fn constraints_for_task(&self, id: TaskId) -> Vec<ConstraintEdge> {
        self.by_task
            .get(&id)
            .map(|edges| edges.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Removes and returns every edge touching `id`.
    pub fn remove_constraints_for_task(&mut self, id: TaskId) -> Vec<ConstraintEdge> {
        let removed = self.by_task.remove(&id).unwrap_or_default();
        for edge in &removed {
            self.edges.remove(edge);
            self.unindex(edge);
        }
        if !removed.is_empty() {
            debug!(
                "event=constraint_purge module=constraints status=ok task={id} removed={}",
                removed.len()
            );
        }
        removed.into_iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintEdge> {
        self.edges.iter()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.by_task.clear();
    }

    fn unindex(&mut self, edge: &ConstraintEdge) {
        for endpoint in [edge.from, edge.to] {
            if let Some(edges) = self.by_task.get_mut(&endpoint) {
                edges.remove(edge);
                if edges.is_empty() {
                    self.by_task.remove(&endpoint);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a ConstraintIndex {
    type Item = &'a ConstraintEdge;
    type IntoIter = std::collections::btree_set::Iter<'a, ConstraintEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::ConstraintIndex;
    use crate::model::constraint::ConstraintKind;
    use crate::model::task::TaskId;

    fn id(index: u32) -> TaskId {
        TaskId::new(index, 0)
    }

    #[test]
    fn endpoint_index_drops_empty_buckets() {
        let mut index = ConstraintIndex::new();
        index.add_constraint(id(1), id(2), ConstraintKind::Hard);
        index.remove_constraint(id(1), id(2), ConstraintKind::Hard);

        assert!(index.is_empty());
        assert!(index.by_task.is_empty());
    }

    #[test]
    fn purge_keeps_other_endpoint_index_in_sync() {
        let mut index = ConstraintIndex::new();
        index.add_constraint(id(1), id(2), ConstraintKind::Hard);
        index.add_constraint(id(2), id(3), ConstraintKind::Soft);

        let removed = index.remove_constraints_for_task(id(2));
        assert_eq!(removed.len(), 2);
        assert!(index.is_empty());
        assert!(index.by_task.is_empty());
    }
}
