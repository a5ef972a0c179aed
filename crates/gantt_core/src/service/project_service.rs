//! Project use-case service.
//!
//! # Responsibility
//! - Compose `TaskTree` and `ConstraintIndex` for a view layer.
//! - Perform the caller-side duties the stores leave out: existence checks
//!   on new dependencies and purging edges before a subtree is removed.
//!
//! # Invariants
//! - The underlying stores stay decoupled; only this facade cascades.
//! - Every method is atomic: on error neither store is mutated.

use crate::model::constraint::{ConstraintEdge, ConstraintKind};
use crate::model::task::{FieldValue, TaskId, TaskNode};
use crate::tree::constraint_index::ConstraintIndex;
use crate::tree::task_tree::{TaskTree, TaskTreeError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by project service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from project service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Dependency endpoints are the same task.
    SelfDependency(TaskId),
    /// Dependency already exists.
    DuplicateConstraint(ConstraintEdge),
    /// Tree-level failure.
    Tree(TaskTreeError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfDependency(id) => write!(f, "task cannot depend on itself: {id}"),
            Self::DuplicateConstraint(edge) => write!(
                f,
                "constraint already exists: {} -> {} ({:?})",
                edge.from, edge.to, edge.kind
            ),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskTreeError> for ServiceError {
    fn from(value: TaskTreeError) -> Self {
        Self::Tree(value)
    }
}

/// Task tree plus dependency graph behind one facade.
#[derive(Debug, Clone, Default)]
pub struct ProjectService {
    tree: TaskTree,
    constraints: ConstraintIndex,
}

impl ProjectService {
    pub fn new(tree: TaskTree) -> Self {
        Self {
            tree,
            constraints: ConstraintIndex::new(),
        }
    }

    /// Adopts stores that were built independently; existing edges may dangle.
    pub fn from_parts(tree: TaskTree, constraints: ConstraintIndex) -> Self {
        Self { tree, constraints }
    }

    pub fn into_parts(self) -> (TaskTree, ConstraintIndex) {
        (self.tree, self.constraints)
    }

    pub fn tree(&self) -> &TaskTree {
        &self.tree
    }

    pub fn constraints(&self) -> &ConstraintIndex {
        &self.constraints
    }

    /// Inserts a pre-built task under optional parent.
    pub fn insert_task(
        &mut self,
        parent: Option<TaskId>,
        position: usize,
        node: TaskNode,
    ) -> ServiceResult<TaskId> {
        Ok(self.tree.insert_node(parent, position, node)?)
    }

    pub fn move_task(
        &mut self,
        id: TaskId,
        new_parent: Option<TaskId>,
        position: usize,
    ) -> ServiceResult<()> {
        Ok(self.tree.move_node(id, new_parent, position)?)
    }

    pub fn set_field(&mut self, id: TaskId, value: FieldValue) -> ServiceResult<()> {
        Ok(self.tree.set(id, value)?)
    }

    /// Adds a dependency between two live tasks.
    pub fn add_dependency(
        &mut self,
        from: TaskId,
        to: TaskId,
        kind: ConstraintKind,
    ) -> ServiceResult<ConstraintEdge> {
        let edge = self.checked_edge(from, to, kind)?;
        if !self.constraints.add_constraint(from, to, kind) {
            return Err(ServiceError::DuplicateConstraint(edge));
        }
        Ok(edge)
    }

    /// Toggles a dependency between two live tasks; returns its new presence.
    pub fn toggle_dependency(
        &mut self,
        from: TaskId,
        to: TaskId,
        kind: ConstraintKind,
    ) -> ServiceResult<bool> {
        self.checked_edge(from, to, kind)?;
        Ok(self.constraints.toggle_constraint(from, to, kind))
    }

    pub fn remove_dependency(&mut self, from: TaskId, to: TaskId, kind: ConstraintKind) -> bool {
        self.constraints.remove_constraint(from, to, kind)
    }

    /// Purges edges touching any node of the subtree, then removes it.
    ///
    /// Returns the number of removed tasks.
    pub fn remove_task(&mut self, id: TaskId) -> ServiceResult<usize> {
        let mut doomed = self.tree.descendants(id)?;
        doomed.push(id);

        let purged: usize = doomed
            .iter()
            .map(|task| self.constraints.remove_constraints_for_task(*task).len())
            .sum();
        let removed = self.tree.remove(id)?;
        debug!(
            "event=project_remove_task module=service status=ok id={id} removed={removed} purged_constraints={purged}"
        );
        Ok(removed)
    }

    /// Edges whose endpoints both resolve to live tasks.
    pub fn renderable_constraints(&self) -> Vec<ConstraintEdge> {
        self.constraints
            .iter()
            .filter(|edge| self.tree.contains(edge.from) && self.tree.contains(edge.to))
            .copied()
            .collect()
    }

    fn checked_edge(
        &self,
        from: TaskId,
        to: TaskId,
        kind: ConstraintKind,
    ) -> ServiceResult<ConstraintEdge> {
        for endpoint in [from, to] {
            if !self.tree.contains(endpoint) {
                return Err(TaskTreeError::NotFound(endpoint).into());
            }
        }
        if from == to {
            return Err(ServiceError::SelfDependency(from));
        }
        Ok(ConstraintEdge::new(from, to, kind))
    }
}
