//! Slot-based schedule produced by the machine scheduler.

use chrono::NaiveDate;

use crate::calendar::offset_date;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::interner::TaskId;

/// Ordered time slots, each holding at most `machines` tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    slots: Vec<Vec<TaskId>>,
    slot_of: Vec<Option<usize>>,
    machines: usize,
}

impl Schedule {
    pub(crate) fn new(slots: Vec<Vec<TaskId>>, slot_of: Vec<Option<usize>>, machines: usize) -> Self {
        Self {
            slots,
            slot_of,
            machines,
        }
    }

    pub fn slots(&self) -> &[Vec<TaskId>] {
        &self.slots
    }

    /// Number of slots used.
    pub fn cmax(&self) -> usize {
        self.slots.len()
    }

    pub fn machines(&self) -> usize {
        self.machines
    }

    /// 0-based slot index of a task by label.
    pub fn slot_of(&self, graph: &Graph, label: &str) -> Result<usize> {
        let id = graph.require(label)?;
        self.slot_of
            .get(id as usize)
            .copied()
            .flatten()
            .ok_or_else(|| Error::UnknownTask(label.to_string()))
    }

    #[inline]
    pub fn slot_of_id(&self, id: TaskId) -> Option<usize> {
        self.slot_of.get(id as usize).copied().flatten()
    }

    /// Slots as label lists.
    pub fn named_slots<'g>(&self, graph: &'g Graph) -> Vec<Vec<&'g str>> {
        self.slots
            .iter()
            .map(|slot| slot.iter().map(|&id| graph.name(id)).collect())
            .collect()
    }

    /// Slot `i` runs on day `start + i`.
    ///
    /// # Returns
    /// * `Err(Error::DateOutOfRange)` if a slot falls past the last
    ///   representable date
    pub fn calendar<'g>(
        &self,
        graph: &'g Graph,
        start: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Vec<&'g str>)>> {
        self.named_slots(graph)
            .into_iter()
            .enumerate()
            .map(|(i, tasks)| Ok((offset_date(start, i as f64)?, tasks)))
            .collect()
    }
}
