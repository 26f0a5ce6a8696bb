//! Per-run mutable scheduler state.

use crate::graph::Graph;
use crate::interner::TaskId;

/// Counters and pools owned by a single scheduling run.
///
/// Built from a fresh copy of the graph's in-degrees, so concurrent runs over
/// the same graph never interfere.
#[derive(Clone, Debug)]
pub struct SchedulerState {
    /// Unresolved predecessor count per task.
    pub remaining: Vec<usize>,
    /// Tasks eligible for the next slot.
    pub ready: Vec<TaskId>,
    /// Released tasks sitting out the next slot.
    pub deferred: Vec<TaskId>,
    /// Slot index per task once placed.
    pub slot_of: Vec<Option<usize>>,
    /// Number of tasks placed so far.
    pub placed: usize,
}

impl SchedulerState {
    /// Ready pool seeded with every zero in-degree task in first-observed order.
    pub fn new(graph: &Graph) -> Self {
        let remaining = graph.in_degrees().to_vec();
        let ready = graph
            .tasks()
            .filter(|&id| remaining[id as usize] == 0)
            .collect();
        Self {
            remaining,
            ready,
            deferred: Vec::new(),
            slot_of: vec![None; graph.len()],
            placed: 0,
        }
    }

    /// Resolve one predecessor edge; true if `task` just became ready.
    pub fn resolve(&mut self, task: TaskId) -> bool {
        let count = &mut self.remaining[task as usize];
        *count -= 1;
        *count == 0
    }

    pub fn is_done(&self) -> bool {
        self.placed == self.slot_of.len()
    }
}
