//! Time-window filter over a flat series of timed records.
//!
//! # Responsibility
//! - Hold the active `[start, end]` window used to zoom/pan a time axis.
//! - Answer visibility and enumeration queries over caller-owned records.
//! - Map timestamps to a numeric axis (hours since a fixed epoch).
//!
//! # Invariants
//! - Records are never copied or owned; every query takes the source slice.
//! - Both bounds are inclusive; an absent bound is unbounded.
//! - Inverted windows (`start > end`) are accepted and match nothing.
//! - Setting an identical window changes nothing, including `revision`.

use crate::config::TimelineConfig;
use crate::model::record::TimedRecord;
use crate::model::task::Timestamp;
use log::debug;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Inclusive time range with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimeWindow {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Window with no bounds on either side.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start.map_or(true, |start| timestamp >= start)
            && self.end.map_or(true, |end| timestamp <= end)
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}

/// Visibility view over a time series.
#[derive(Debug, Clone)]
pub struct TimeWindowFilter {
    window: TimeWindow,
    epoch: Timestamp,
    revision: u64,
}

impl Default for TimeWindowFilter {
    fn default() -> Self {
        Self::with_config(&TimelineConfig::default())
    }
}

impl TimeWindowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TimelineConfig) -> Self {
        Self {
            window: TimeWindow::unbounded(),
            epoch: config.epoch,
            revision: 0,
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    /// Counter bumped each time the window actually changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the active window. Returns `false` when it was unchanged.
    pub fn set_window(&mut self, start: Option<Timestamp>, end: Option<Timestamp>) -> bool {
        let window = TimeWindow::new(start, end);
        if window == self.window {
            return false;
        }
        self.window = window;
        self.revision += 1;
        debug!(
            "event=window_set module=timeline status=ok start={} end={} inverted={}",
            display_bound(start),
            display_bound(end),
            window.is_inverted()
        );
        true
    }

    pub fn is_visible<R: TimedRecord>(&self, record: &R) -> bool {
        self.window.contains(record.timestamp())
    }

    /// Records inside the window, in source order.
    pub fn visible<'a, R: TimedRecord>(&'a self, source: &'a [R]) -> impl Iterator<Item = &'a R> + 'a {
        source.iter().filter(move |record| self.is_visible(*record))
    }

    pub fn visible_count<R: TimedRecord>(&self, source: &[R]) -> usize {
        self.visible(source).count()
    }

    /// The `index`-th visible record, or `None` past the end.
    pub fn visible_at<'a, R: TimedRecord>(&self, source: &'a [R], index: usize) -> Option<&'a R> {
        source
            .iter()
            .filter(|record| self.is_visible(*record))
            .nth(index)
    }

    /// Hours between the epoch and `record`, truncated to whole seconds.
    pub fn axis_value<R: TimedRecord>(&self, record: &R) -> f64 {
        let seconds = record.timestamp().signed_duration_since(self.epoch).num_seconds();
        seconds as f64 / SECONDS_PER_HOUR
    }

    /// Axis values of the visible records, in source order.
    pub fn axis_values<R: TimedRecord>(&self, source: &[R]) -> Vec<f64> {
        self.visible(source)
            .map(|record| self.axis_value(record))
            .collect()
    }
}

fn display_bound(bound: Option<Timestamp>) -> String {
    bound
        .map(|value| value.to_rfc3339())
        .unwrap_or_else(|| "open".to_string())
}

#[cfg(test)]
mod tests {
    use super::TimeWindow;
    use chrono::{TimeZone, Utc};

    #[test]
    fn bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let window = TimeWindow::new(Some(start), Some(end));

        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn inverted_window_matches_nothing() {
        let start = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::new(Some(start), Some(end));

        assert!(window.is_inverted());
        assert!(!window.contains(start));
        assert!(!window.contains(end));
    }
}
