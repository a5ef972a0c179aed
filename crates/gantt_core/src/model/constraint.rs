//! Dependency edge model.
//!
//! Edges reference tasks by `TaskId` value only. They stay meaningful across
//! reorder/move and are not invalidated by the tree itself.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};

/// Strength of a scheduling dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Must be honored by a scheduler.
    Hard,
    /// Informational; rendered but not enforced.
    Soft,
}

/// Directed edge "`from` precedes/relates to `to`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintEdge {
    pub from: TaskId,
    pub to: TaskId,
    pub kind: ConstraintKind,
}

impl ConstraintEdge {
    pub fn new(from: TaskId, to: TaskId, kind: ConstraintKind) -> Self {
        Self { from, to, kind }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
