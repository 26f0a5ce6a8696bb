//! Types for the timing analysis.

use crate::interner::TaskId;

/// Floor of the zero-slack and tight-edge tolerance.
pub const EPSILON: f64 = 1e-9;

/// Tolerance per unit of makespan, so rounding on large schedules stays zero.
pub const RELATIVE_EPSILON: f64 = 1e-12;

/// Per-task timing record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaskTiming {
    /// Earliest start (forward pass): all inbound activities completed.
    pub earliest_start: f64,
    /// Latest start (backward pass) that does not delay the makespan.
    pub latest_start: f64,
    /// Slack = latest_start - earliest_start.
    pub slack: f64,
}

impl TaskTiming {
    /// Slack within tolerance is stored as exactly zero by the analysis.
    pub fn is_critical(&self) -> bool {
        self.slack.abs() < EPSILON
    }
}

/// One activity (edge) placed on a Gantt lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityBar {
    pub from: TaskId,
    pub to: TaskId,
    /// ES of the edge's source task.
    pub start: f64,
    pub finish: f64,
    /// 0-based lane (machine row) index.
    pub lane: usize,
}

impl ActivityBar {
    /// Half-open interval overlap.
    pub fn overlaps(&self, start: f64, finish: f64) -> bool {
        start < self.finish && finish > self.start
    }
}
