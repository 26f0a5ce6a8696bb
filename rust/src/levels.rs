//! Scheduling priorities ("levels") consumed by the machine scheduler.
//!
//! The default level of a task is its 1-based topological rank, not its
//! longest-path depth. Lower levels are scheduled first.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::interner::TaskId;
use crate::topological::TopologicalOrder;

/// Per-task level, indexed by task ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<usize>,
}

impl Levels {
    /// `level(order[i]) = i + 1`.
    pub fn from_order(order: &TopologicalOrder) -> Self {
        let mut levels = vec![0usize; order.len()];
        for (i, &id) in order.as_slice().iter().enumerate() {
            levels[id as usize] = i + 1;
        }
        Self { levels }
    }

    /// Caller-supplied priorities keyed by label.
    ///
    /// Every task of the graph needs a level and every label must exist.
    pub fn from_named(graph: &Graph, named: &FxHashMap<String, usize>) -> Result<Self> {
        let mut levels: Vec<Option<usize>> = vec![None; graph.len()];
        for (label, &level) in named {
            let id = graph.require(label)?;
            levels[id as usize] = Some(level);
        }

        let levels = levels
            .into_iter()
            .enumerate()
            .map(|(idx, level)| {
                level.ok_or_else(|| Error::UnknownTask(graph.name(idx as TaskId).to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { levels })
    }

    #[inline]
    pub fn get(&self, id: TaskId) -> usize {
        self.levels[id as usize]
    }

    /// Level of a task by label.
    pub fn of(&self, graph: &Graph, label: &str) -> Result<usize> {
        let id = graph.require(label)?;
        self.levels
            .get(id as usize)
            .copied()
            .ok_or_else(|| Error::UnknownTask(label.to_string()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
