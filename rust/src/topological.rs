//! Kahn's algorithm linearization of the precedence graph.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::interner::TaskId;
use crate::log_debug;

/// A topological order of every task plus each task's 1-based rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    order: Vec<TaskId>,
    rank: Vec<usize>,
}

impl TopologicalOrder {
    /// Tasks in order.
    pub fn as_slice(&self) -> &[TaskId] {
        &self.order
    }

    /// 1-based position of a task in the order.
    pub fn rank(&self, id: TaskId) -> usize {
        self.rank[id as usize]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Task labels in order.
    pub fn labels<'g>(&self, graph: &'g Graph) -> Vec<&'g str> {
        self.order.iter().map(|&id| graph.name(id)).collect()
    }
}

/// Linearize the graph with Kahn's algorithm.
///
/// Simultaneously eligible tasks are taken in the order they were first
/// observed while scanning the edge list; successors are released in edge
/// insertion order.
///
/// # Returns
/// * `Err(Error::CyclicGraph)` if not every task could be ordered
pub fn topological_sort(graph: &Graph, verbosity: u8) -> Result<TopologicalOrder> {
    // Destructively decremented below, so never touch the graph's own counts
    let mut in_degree = graph.in_degrees().to_vec();

    let mut queue: VecDeque<TaskId> = graph
        .tasks()
        .filter(|&id| in_degree[id as usize] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    let mut rank = vec![0usize; graph.len()];

    while let Some(current) = queue.pop_front() {
        order.push(current);
        rank[current as usize] = order.len();
        log_debug!(
            verbosity,
            "  Ordered {} at rank {}",
            graph.name(current),
            order.len()
        );

        for edge in graph.successors(current) {
            let degree = &mut in_degree[edge.to as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(edge.to);
            }
        }
    }

    if order.len() < graph.len() {
        return Err(Error::CyclicGraph {
            ordered: order.len(),
            total: graph.len(),
        });
    }

    Ok(TopologicalOrder { order, rank })
}
