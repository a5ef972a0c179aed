//! Task node domain model.
//!
//! # Responsibility
//! - Define the record stored in every `TaskTree` slot.
//! - Define the field/column vocabulary used by indexed views.
//!
//! # Invariants
//! - `start <= end` when both are set and `kind != Summary`.
//! - `Summary` nodes never carry direct `start`/`end`; their span is derived
//!   from descendants by the consumer.
//! - `completion` stays within `0..=100`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Point in time used for task bounds and timed records.
pub type Timestamp = DateTime<Utc>;

/// Highest accepted completion percentage.
pub const MAX_COMPLETION: u8 = 100;

/// Stable handle for one task node.
///
/// `index` addresses an arena slot, `generation` tells apart successive
/// occupants of that slot, so a handle is never valid for two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl TaskId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Row category of a Gantt item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Zero-length milestone.
    Event,
    /// Regular bar with start and end.
    #[default]
    Task,
    /// Group row spanning its descendants.
    Summary,
    /// Several bars rendered on one row.
    Multi,
}

/// One task/event/summary/multi-task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// User-facing label.
    pub label: String,
    /// Serialized as `type` to match the column header.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    /// Percentage in `0..=100`.
    pub completion: Option<u8>,
    pub legend: String,
    pub read_only: bool,
}

impl TaskNode {
    /// Creates a writable task with no dates.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_kind(TaskKind::Task, label)
    }

    pub fn with_kind(kind: TaskKind, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            start: None,
            end: None,
            completion: None,
            legend: String::new(),
            read_only: false,
        }
    }

    /// Builder-style helper used by seeding code and tests.
    pub fn spanning(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Returns whether `start..=end` is well ordered, treating absent bounds
    /// as unconstrained.
    pub fn has_ordered_span(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Returns whether this node carries any user-supplied date.
    pub fn has_direct_span(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Reads one field as a column value.
    pub fn field(&self, field: TaskField) -> FieldValue {
        match field {
            TaskField::Label => FieldValue::Label(self.label.clone()),
            TaskField::Kind => FieldValue::Kind(self.kind),
            TaskField::Start => FieldValue::Start(self.start),
            TaskField::End => FieldValue::End(self.end),
            TaskField::Completion => FieldValue::Completion(self.completion),
            TaskField::Legend => FieldValue::Legend(self.legend.clone()),
            TaskField::ReadOnly => FieldValue::ReadOnly(self.read_only),
        }
    }

    pub(crate) fn apply(&mut self, value: FieldValue) {
        match value {
            FieldValue::Label(label) => self.label = label,
            FieldValue::Kind(kind) => self.kind = kind,
            FieldValue::Start(start) => self.start = start,
            FieldValue::End(end) => self.end = end,
            FieldValue::Completion(completion) => self.completion = completion,
            FieldValue::Legend(legend) => self.legend = legend,
            FieldValue::ReadOnly(read_only) => self.read_only = read_only,
        }
    }
}

/// Addressable attribute of a `TaskNode`.
///
/// The declaration order is the column order of an indexed tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Label,
    Kind,
    Start,
    End,
    Completion,
    Legend,
    ReadOnly,
}

impl TaskField {
    /// All fields in column order.
    pub const COLUMNS: [TaskField; 7] = [
        TaskField::Label,
        TaskField::Kind,
        TaskField::Start,
        TaskField::End,
        TaskField::Completion,
        TaskField::Legend,
        TaskField::ReadOnly,
    ];

    pub fn column(self) -> usize {
        match self {
            Self::Label => 0,
            Self::Kind => 1,
            Self::Start => 2,
            Self::End => 3,
            Self::Completion => 4,
            Self::Legend => 5,
            Self::ReadOnly => 6,
        }
    }

    /// Maps a view column back to a field. `None` when out of range.
    pub fn from_column(column: usize) -> Option<Self> {
        Self::COLUMNS.get(column).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Kind => "type",
            Self::Start => "start",
            Self::End => "end",
            Self::Completion => "completion",
            Self::Legend => "legend",
            Self::ReadOnly => "read_only",
        }
    }
}

/// Typed value of one `TaskField`, used for field-level read/write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Label(String),
    Kind(TaskKind),
    Start(Option<Timestamp>),
    End(Option<Timestamp>),
    Completion(Option<u8>),
    Legend(String),
    ReadOnly(bool),
}

impl FieldValue {
    /// Field this value writes to.
    pub fn field(&self) -> TaskField {
        match self {
            Self::Label(_) => TaskField::Label,
            Self::Kind(_) => TaskField::Kind,
            Self::Start(_) => TaskField::Start,
            Self::End(_) => TaskField::End,
            Self::Completion(_) => TaskField::Completion,
            Self::Legend(_) => TaskField::Legend,
            Self::ReadOnly(_) => TaskField::ReadOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, TaskField, TaskKind, TaskNode};
    use chrono::{TimeZone, Utc};

    #[test]
    fn columns_round_trip_through_index() {
        for (index, field) in TaskField::COLUMNS.iter().enumerate() {
            assert_eq!(field.column(), index);
            assert_eq!(TaskField::from_column(index), Some(*field));
        }
        assert_eq!(TaskField::from_column(TaskField::COLUMNS.len()), None);
    }

    #[test]
    fn apply_writes_only_the_addressed_field() {
        let mut node = TaskNode::new("Design");
        node.apply(FieldValue::Completion(Some(40)));

        assert_eq!(node.completion, Some(40));
        assert_eq!(node.label, "Design");
        assert_eq!(node.kind, TaskKind::Task);
        assert_eq!(node.field(TaskField::Completion), FieldValue::Completion(Some(40)));
    }

    #[test]
    fn ordered_span_ignores_missing_bounds() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();

        let mut node = TaskNode::new("x");
        node.start = Some(late);
        assert!(node.has_ordered_span());

        node.end = Some(early);
        assert!(!node.has_ordered_span());
    }
}
