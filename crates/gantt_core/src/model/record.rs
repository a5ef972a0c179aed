//! Time-stamped records consumed by `TimeWindowFilter`.

use crate::model::task::{TaskId, Timestamp};
use serde::{Deserialize, Serialize};

/// Anything that can be placed on a time axis.
pub trait TimedRecord {
    fn timestamp(&self) -> Timestamp;
}

/// One sample of a plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedPoint {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl TimedPoint {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl TimedRecord for TimedPoint {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Flattened view of one dated leaf task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMilestone {
    pub task: TaskId,
    pub timestamp: Timestamp,
}

impl TimedRecord for TaskMilestone {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
