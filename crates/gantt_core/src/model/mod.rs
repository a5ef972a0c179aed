//! Domain model for Gantt rows, dependency edges and timed records.
//!
//! # Responsibility
//! - Define the value types shared by tree, constraint and timeline code.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` that is never reused.
//! - Constraint edges refer to tasks by id, never by tree position.

pub mod constraint;
pub mod record;
pub mod task;
