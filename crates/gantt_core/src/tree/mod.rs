//! In-memory task structures.
//!
//! # Responsibility
//! - Own the task forest (`TaskTree`) and the dependency graph
//!   (`ConstraintIndex`) as two independent stores.
//!
//! # Invariants
//! - The two stores share nothing but `TaskId` values.
//! - Removing a task never cascades into the constraint index.

pub mod constraint_index;
pub mod task_tree;
