//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gantt_core` linkage by building a small demo project.
//! - Keep output deterministic for quick local sanity checks.

use chrono::{DateTime, Duration, Utc};
use gantt_core::{
    ConstraintKind, ProjectService, TaskKind, TaskNode, TaskTree, TimeWindowFilter,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("gantt_core version={}", gantt_core::core_version());
    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gantt_core demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), gantt_core::ServiceError> {
    let hour = |h: i64| DateTime::<Utc>::UNIX_EPOCH + Duration::hours(h);
    let mut project = ProjectService::new(TaskTree::new());

    let phase = project.insert_task(None, 0, TaskNode::with_kind(TaskKind::Summary, "Phase 1"))?;
    let design = project.insert_task(Some(phase), 0, TaskNode::new("Design").spanning(hour(0), hour(8)))?;
    let build = project.insert_task(Some(phase), 1, TaskNode::new("Build").spanning(hour(10), hour(30)))?;
    let review = project.insert_task(
        None,
        1,
        TaskNode::with_kind(TaskKind::Event, "Review").spanning(hour(32), hour(32)),
    )?;
    project.add_dependency(design, build, ConstraintKind::Hard)?;
    project.add_dependency(build, review, ConstraintKind::Soft)?;

    let tree = project.tree();
    println!("tasks={} roots={}", tree.len(), tree.roots().len());
    println!("constraints={}", project.renderable_constraints().len());

    let milestones = tree.milestones();
    let mut filter = TimeWindowFilter::new();
    filter.set_window(Some(hour(5)), Some(hour(31)));
    for milestone in filter.visible(&milestones) {
        let label = &tree.get(milestone.task)?.label;
        println!("visible label={label} axis={}", filter.axis_value(milestone));
    }
    Ok(())
}
