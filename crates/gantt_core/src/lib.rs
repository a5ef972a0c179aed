//! Core model layer for Gantt views.
//!
//! Three independent pieces: a task forest (`TaskTree`), a dependency graph
//! over task ids (`ConstraintIndex`) and a zoomable time filter
//! (`TimeWindowFilter`). Rendering and persistence live elsewhere.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod tree;
pub mod view;

pub use config::{ConfigError, CoreConfig, LoggingConfig, TimelineConfig, TreeConfig};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::constraint::{ConstraintEdge, ConstraintKind};
pub use model::record::{TaskMilestone, TimedPoint, TimedRecord};
pub use model::task::{FieldValue, TaskField, TaskId, TaskKind, TaskNode, Timestamp};
pub use service::project_service::{ProjectService, ServiceError, ServiceResult};
pub use tree::constraint_index::ConstraintIndex;
pub use tree::task_tree::{TaskTree, TaskTreeError, TaskTreeResult};
pub use view::time_window::{TimeWindow, TimeWindowFilter};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
