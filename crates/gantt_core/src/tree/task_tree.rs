//! Arena-backed task forest.
//!
//! # Responsibility
//! - Own every `TaskNode` and its parent/child links.
//! - Provide structural mutation (insert/remove/move) and field access.
//!
//! # Invariants
//! - A node's parent pointer and its parent's child list always agree.
//! - Child order is insertion order and doubles as display order.
//! - Every operation is atomic: on error nothing is mutated.
//! - `TaskId`s are never reused; removed ids resolve to `NotFound`.

use crate::config::TreeConfig;
use crate::model::record::TaskMilestone;
use crate::model::task::{FieldValue, TaskField, TaskId, TaskKind, TaskNode, Timestamp, MAX_COMPLETION};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by task tree operations.
pub type TaskTreeResult<T> = Result<T, TaskTreeError>;

/// Errors from task tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTreeError {
    /// Id is unknown or its node was removed.
    NotFound(TaskId),
    /// `start` would be later than `end`.
    InvalidRange { start: Timestamp, end: Timestamp },
    /// Move target is the node itself or one of its descendants.
    CyclicMove { node: TaskId, parent: TaskId },
    /// Summary spans are derived; direct dates are not accepted.
    SummarySpanDerived,
    /// Completion above `MAX_COMPLETION`.
    InvalidCompletion(u8),
    /// Node is read-only; only the `read_only` flag can change.
    ReadOnly(TaskId),
}

impl Display for TaskTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidRange { start, end } => {
                write!(f, "task end ({end}) must be >= start ({start})")
            }
            Self::CyclicMove { node, parent } => write!(
                f,
                "move would create cycle: task {node} under parent {parent}"
            ),
            Self::SummarySpanDerived => {
                write!(f, "summary task cannot carry direct start/end")
            }
            Self::InvalidCompletion(value) => {
                write!(f, "completion {value} is outside 0..={MAX_COMPLETION}")
            }
            Self::ReadOnly(id) => write!(f, "task is read-only: {id}"),
        }
    }
}

impl Error for TaskTreeError {}

#[derive(Debug, Clone)]
struct Entry {
    node: TaskNode,
    parent: Option<TaskId>,
    children: Vec<TaskId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Mutable ordered forest of task nodes.
#[derive(Debug, Clone)]
pub struct TaskTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<TaskId>,
    len: usize,
    unnamed_label: String,
    unnamed_count: u64,
    revision: u64,
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::with_config(&TreeConfig::default())
    }
}

impl TaskTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TreeConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            len: 0,
            unnamed_label: config.unnamed_label.clone(),
            unnamed_count: 0,
            revision: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.entry(id).is_some()
    }

    /// Inserts a default node as the `position`-th child of `parent`.
    ///
    /// `position` is clamped to `0..=child_count(parent)`. The label comes
    /// from the per-tree unnamed counter.
    pub fn insert(&mut self, parent: Option<TaskId>, position: usize) -> TaskTreeResult<TaskId> {
        self.ensure_parent(parent)?;
        self.unnamed_count += 1;
        let node = TaskNode::new(format!("{} {}", self.unnamed_label, self.unnamed_count));
        Ok(self.attach_new(parent, position, node))
    }

    /// Inserts a pre-built node after validating its fields.
    pub fn insert_node(
        &mut self,
        parent: Option<TaskId>,
        position: usize,
        node: TaskNode,
    ) -> TaskTreeResult<TaskId> {
        self.ensure_parent(parent)?;
        validate_node(&node)?;
        Ok(self.attach_new(parent, position, node))
    }

    /// Removes `id` and its whole subtree. Returns the number of removed nodes.
    ///
    /// Constraint edges touching removed nodes are not purged here.
    pub fn remove(&mut self, id: TaskId) -> TaskTreeResult<usize> {
        let parent = match self.entry(id) {
            Some(entry) => entry.parent,
            None => {
                warn!("event=task_remove module=tree status=error reason=not_found id={id}");
                return Err(TaskTreeError::NotFound(id));
            }
        };

        let subtree = self.subtree(id);
        self.siblings_mut(parent).retain(|child| *child != id);
        for removed in &subtree {
            self.release(*removed);
        }
        self.revision += 1;

        debug!(
            "event=task_remove module=tree status=ok id={id} removed={}",
            subtree.len()
        );
        Ok(subtree.len())
    }

    /// Re-parents the subtree rooted at `id` under `new_parent` at `position`.
    ///
    /// `position` is clamped against the destination child list after `id`
    /// has been detached, so moving within one parent behaves like a reorder.
    pub fn move_node(
        &mut self,
        id: TaskId,
        new_parent: Option<TaskId>,
        position: usize,
    ) -> TaskTreeResult<()> {
        let old_parent = self.entry(id).ok_or(TaskTreeError::NotFound(id))?.parent;
        if let Some(parent) = new_parent {
            if !self.contains(parent) {
                return Err(TaskTreeError::NotFound(parent));
            }
            if self.is_self_or_ancestor(id, parent) {
                warn!(
                    "event=task_move module=tree status=error reason=cycle id={id} parent={parent}"
                );
                return Err(TaskTreeError::CyclicMove { node: id, parent });
            }
        }

        self.siblings_mut(old_parent).retain(|child| *child != id);
        let siblings = self.siblings_mut(new_parent);
        let index = position.min(siblings.len());
        siblings.insert(index, id);
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = new_parent;
        }
        self.revision += 1;

        debug!(
            "event=task_move module=tree status=ok id={id} parent={} position={index}",
            display_parent(new_parent)
        );
        Ok(())
    }

    pub fn get(&self, id: TaskId) -> TaskTreeResult<&TaskNode> {
        self.entry(id)
            .map(|entry| &entry.node)
            .ok_or(TaskTreeError::NotFound(id))
    }

    /// Reads one field of `id`.
    pub fn field(&self, id: TaskId, field: TaskField) -> TaskTreeResult<FieldValue> {
        Ok(self.get(id)?.field(field))
    }

    /// Writes one field of `id`, rejecting values that break node invariants.
    pub fn set(&mut self, id: TaskId, value: FieldValue) -> TaskTreeResult<()> {
        let node = self.get(id)?;
        let field = value.field();
        if node.read_only && field != TaskField::ReadOnly {
            return Err(TaskTreeError::ReadOnly(id));
        }

        let mut candidate = node.clone();
        candidate.apply(value);
        validate_node(&candidate)?;

        if let Some(entry) = self.entry_mut(id) {
            entry.node = candidate;
        }
        self.revision += 1;
        debug!(
            "event=task_set module=tree status=ok id={id} field={}",
            field.name()
        );
        Ok(())
    }

    /// Ordered children of `parent`, or the roots when `parent` is `None`.
    pub fn children(&self, parent: Option<TaskId>) -> TaskTreeResult<&[TaskId]> {
        match parent {
            None => Ok(&self.roots),
            Some(id) => self
                .entry(id)
                .map(|entry| entry.children.as_slice())
                .ok_or(TaskTreeError::NotFound(id)),
        }
    }

    pub fn roots(&self) -> &[TaskId] {
        &self.roots
    }

    pub fn child_count(&self, parent: Option<TaskId>) -> TaskTreeResult<usize> {
        Ok(self.children(parent)?.len())
    }

    /// Returns the `row`-th child of `parent`.
    ///
    /// # Panics
    /// Panics when `row >= child_count(parent)`, like slice indexing.
    pub fn child_at(&self, parent: Option<TaskId>, row: usize) -> TaskTreeResult<TaskId> {
        Ok(self.children(parent)?[row])
    }

    pub fn parent_of(&self, id: TaskId) -> TaskTreeResult<Option<TaskId>> {
        self.entry(id)
            .map(|entry| entry.parent)
            .ok_or(TaskTreeError::NotFound(id))
    }

    /// Returns `(parent, row)` so an indexed view can map an id back to a row.
    pub fn position_of(&self, id: TaskId) -> TaskTreeResult<(Option<TaskId>, usize)> {
        let parent = self.parent_of(id)?;
        let row = self
            .children(parent)?
            .iter()
            .position(|child| *child == id)
            .ok_or(TaskTreeError::NotFound(id))?;
        Ok((parent, row))
    }

    /// All descendants of `id` in depth-first pre-order, excluding `id`.
    pub fn descendants(&self, id: TaskId) -> TaskTreeResult<Vec<TaskId>> {
        if !self.contains(id) {
            return Err(TaskTreeError::NotFound(id));
        }
        let mut nodes = self.subtree(id);
        nodes.remove(0);
        Ok(nodes)
    }

    /// Every node in depth-first pre-order, roots in display order.
    pub fn depth_first(&self) -> Vec<TaskId> {
        let mut out = Vec::with_capacity(self.len);
        for root in &self.roots {
            out.extend(self.subtree(*root));
        }
        out
    }

    /// Childless nodes in depth-first order.
    pub fn leaves(&self) -> Vec<TaskId> {
        self.depth_first()
            .into_iter()
            .filter(|id| {
                self.entry(*id)
                    .map(|entry| entry.children.is_empty())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Leaves with a start date, flattened for time-series views.
    pub fn milestones(&self) -> Vec<TaskMilestone> {
        self.leaves()
            .into_iter()
            .filter_map(|task| {
                let start = self.entry(task)?.node.start?;
                Some(TaskMilestone {
                    task,
                    timestamp: start,
                })
            })
            .collect()
    }

    /// Checks that parent pointers and child lists agree for every node.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0usize;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(entry) = &slot.entry else {
                continue;
            };
            seen += 1;
            let id = TaskId::new(index as u32, slot.generation);
            let siblings = match entry.parent {
                None => self.roots.as_slice(),
                Some(parent) => match self.entry(parent) {
                    Some(parent_entry) => parent_entry.children.as_slice(),
                    None => return false,
                },
            };
            if siblings.iter().filter(|child| **child == id).count() != 1 {
                return false;
            }
            for child in &entry.children {
                match self.entry(*child) {
                    Some(child_entry) if child_entry.parent == Some(id) => {}
                    _ => return false,
                }
            }
        }
        let roots_ok = self
            .roots
            .iter()
            .all(|root| matches!(self.entry(*root), Some(entry) if entry.parent.is_none()));
        roots_ok && seen == self.len
    }

    fn attach_new(&mut self, parent: Option<TaskId>, position: usize, node: TaskNode) -> TaskId {
        let id = self.allocate(Entry {
            node,
            parent,
            children: Vec::new(),
        });
        let siblings = self.siblings_mut(parent);
        let index = position.min(siblings.len());
        siblings.insert(index, id);
        self.len += 1;
        self.revision += 1;

        debug!(
            "event=task_insert module=tree status=ok id={id} parent={} position={index}",
            display_parent(parent)
        );
        id
    }

    fn allocate(&mut self, entry: Entry) -> TaskId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return TaskId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        TaskId::new(index, 0)
    }

    fn release(&mut self, id: TaskId) {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation || slot.entry.take().is_none() {
            return;
        }
        self.len -= 1;
        // Exhausted slots are retired so no handle can ever alias.
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(id.index);
        }
    }

    fn entry(&self, id: TaskId) -> Option<&Entry> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: TaskId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn ensure_parent(&self, parent: Option<TaskId>) -> TaskTreeResult<()> {
        match parent {
            Some(id) if !self.contains(id) => Err(TaskTreeError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Child list of `parent`; callers must have checked that it exists.
    fn siblings_mut(&mut self, parent: Option<TaskId>) -> &mut Vec<TaskId> {
        match parent {
            None => &mut self.roots,
            Some(id) => {
                let slot = &mut self.slots[id.index as usize];
                match slot.entry.as_mut() {
                    Some(entry) => &mut entry.children,
                    None => unreachable!("parent {id} checked before mutation"),
                }
            }
        }
    }

    /// `id` followed by its descendants in pre-order.
    fn subtree(&self, id: TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(entry) = self.entry(current) {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        out
    }

    /// Walks up from `candidate` looking for `ancestor`.
    fn is_self_or_ancestor(&self, ancestor: TaskId, candidate: TaskId) -> bool {
        let mut cursor = Some(candidate);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.entry(current).and_then(|entry| entry.parent);
        }
        false
    }
}

fn validate_node(node: &TaskNode) -> TaskTreeResult<()> {
    if let Some(completion) = node.completion {
        if completion > MAX_COMPLETION {
            return Err(TaskTreeError::InvalidCompletion(completion));
        }
    }
    if node.kind == TaskKind::Summary {
        if node.has_direct_span() {
            return Err(TaskTreeError::SummarySpanDerived);
        }
        return Ok(());
    }
    match (node.start, node.end) {
        (Some(start), Some(end)) if !node.has_ordered_span() => {
            Err(TaskTreeError::InvalidRange { start, end })
        }
        _ => Ok(()),
    }
}

fn display_parent(parent: Option<TaskId>) -> String {
    parent
        .map(|id| id.to_string())
        .unwrap_or_else(|| "root".to_string())
}

#[cfg(test)]
mod tests {
    use super::{TaskTree, TaskTreeError};
    use crate::config::TreeConfig;

    #[test]
    fn removed_slot_is_reused_with_new_generation() {
        let mut tree = TaskTree::new();
        let first = tree.insert(None, 0).unwrap();
        tree.remove(first).unwrap();
        let second = tree.insert(None, 0).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.index, second.index);
        assert_eq!(tree.get(first).unwrap_err(), TaskTreeError::NotFound(first));
        assert!(tree.get(second).is_ok());
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut tree = TaskTree::new();
        let id = tree.insert(None, 0).unwrap();
        tree.slots[id.index as usize].generation = u32::MAX;
        let id = super::TaskId::new(id.index, u32::MAX);
        tree.roots[0] = id;

        tree.remove(id).unwrap();
        assert!(tree.free.is_empty());
        let next = tree.insert(None, 0).unwrap();
        assert_ne!(next.index, id.index);
        assert!(tree.is_consistent());
    }

    #[test]
    fn unnamed_labels_use_config_prefix_and_per_tree_counter() {
        let config = TreeConfig {
            unnamed_label: "Row".to_string(),
        };
        let mut tree = TaskTree::with_config(&config);
        let a = tree.insert(None, 0).unwrap();
        let b = tree.insert(None, 1).unwrap();
        assert_eq!(tree.get(a).unwrap().label, "Row 1");
        assert_eq!(tree.get(b).unwrap().label, "Row 2");

        let mut other = TaskTree::with_config(&config);
        let c = other.insert(None, 0).unwrap();
        assert_eq!(other.get(c).unwrap().label, "Row 1");
    }
}
