//! Activity-on-edge precedence graph.
//!
//! Durations are charged to edges, not tasks. The graph is read-only once
//! built; every later phase keeps its own per-run state.

use rustc_hash::FxHashMap;

use crate::config::DuplicateEdgePolicy;
use crate::error::{Error, Result};
use crate::interner::{TaskId, TaskIdInterner};
use crate::log_checks;

/// A precedence edge: `to` may start only after the activity of `duration`
/// starting at `from` has completed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: TaskId,
    pub to: TaskId,
    pub duration: f64,
}

/// Precedence triple as supplied by callers, keyed by task labels.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub duration: f64,
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>, duration: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            duration,
        }
    }
}

impl<F: Into<String>, T: Into<String>> From<(F, T, f64)> for EdgeSpec {
    fn from((from, to, duration): (F, T, f64)) -> Self {
        Self::new(from, to, duration)
    }
}

/// Incremental graph construction.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    names: TaskIdInterner,
    edges: Vec<Edge>,
    edge_index: FxHashMap<(TaskId, TaskId), usize>,
    policy: DuplicateEdgePolicy,
    verbosity: u8,
}

impl GraphBuilder {
    pub fn new(policy: DuplicateEdgePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Declare a task that may have no edges at all.
    pub fn add_task(&mut self, label: &str) -> TaskId {
        self.names.intern(label)
    }

    /// Add a precedence edge, interning both endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, duration: f64) -> Result<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidDuration {
                from: from.to_string(),
                to: to.to_string(),
                duration,
            });
        }

        let from_id = self.add_task(from);
        let to_id = self.add_task(to);

        if let Some(&idx) = self.edge_index.get(&(from_id, to_id)) {
            let edge = &mut self.edges[idx];
            match self.policy {
                DuplicateEdgePolicy::Overwrite => {
                    log_checks!(
                        self.verbosity,
                        "  Duplicate edge {} -> {}: duration {} replaced by {}",
                        from,
                        to,
                        edge.duration,
                        duration
                    );
                    edge.duration = duration;
                }
                DuplicateEdgePolicy::Sum => {
                    log_checks!(
                        self.verbosity,
                        "  Duplicate edge {} -> {}: duration {} + {}",
                        from,
                        to,
                        edge.duration,
                        duration
                    );
                    edge.duration += duration;
                }
                DuplicateEdgePolicy::Reject => {
                    return Err(Error::DuplicateEdge {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
            }
            return Ok(());
        }

        self.edge_index.insert((from_id, to_id), self.edges.len());
        self.edges.push(Edge {
            from: from_id,
            to: to_id,
            duration,
        });
        Ok(())
    }

    /// Freeze the builder into adjacency form.
    pub fn build(self) -> Graph {
        let n = self.names.len();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for (idx, edge) in self.edges.iter().enumerate() {
            successors[edge.from as usize].push(idx);
            predecessors[edge.to as usize].push(idx);
            in_degree[edge.to as usize] += 1;
        }

        Graph {
            names: self.names,
            edges: self.edges,
            successors,
            predecessors,
            in_degree,
        }
    }
}

/// Immutable precedence graph.
///
/// Adjacency lists hold indices into `edges` and preserve insertion order.
#[derive(Debug, Clone)]
pub struct Graph {
    names: TaskIdInterner,
    edges: Vec<Edge>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl Graph {
    /// Build a graph from precedence triples with the default overwrite policy.
    pub fn build<I, E>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        Self::build_with(edges, DuplicateEdgePolicy::default(), 0)
    }

    pub fn build_with<I, E>(edges: I, policy: DuplicateEdgePolicy, verbosity: u8) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        let mut builder = GraphBuilder::new(policy).verbosity(verbosity);
        for spec in edges {
            let spec = spec.into();
            builder.add_edge(&spec.from, &spec.to, spec.duration)?;
        }
        Ok(builder.build())
    }

    /// Number of distinct tasks.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Task IDs in first-observed order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> {
        0..self.names.len() as TaskId
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn task_id(&self, label: &str) -> Option<TaskId> {
        self.names.get(label)
    }

    /// Like [`Graph::task_id`], failing with [`Error::UnknownTask`].
    pub fn require(&self, label: &str) -> Result<TaskId> {
        self.task_id(label)
            .ok_or_else(|| Error::UnknownTask(label.to_string()))
    }

    /// Label of an interned task. IDs handed out by this graph always resolve.
    pub fn name(&self, id: TaskId) -> &str {
        self.names.resolve(id).unwrap_or_default()
    }

    /// Outgoing edges of a task, in insertion order.
    pub fn successors(&self, id: TaskId) -> impl Iterator<Item = &Edge> + '_ {
        self.successors
            .get(id as usize)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    /// Incoming edges of a task, in insertion order.
    pub fn incoming(&self, id: TaskId) -> impl Iterator<Item = &Edge> + '_ {
        self.predecessors
            .get(id as usize)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    pub fn out_degree(&self, id: TaskId) -> usize {
        self.successors.get(id as usize).map_or(0, Vec::len)
    }

    /// In-degree per task, indexed by ID. Callers copy this before mutating.
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    /// Successor labels and durations; empty for unknown labels.
    pub fn neighbors(&self, label: &str) -> Vec<(&str, f64)> {
        self.task_id(label)
            .map(|id| {
                self.successors(id)
                    .map(|e| (self.name(e.to), e.duration))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Predecessor labels and durations; empty for unknown labels.
    pub fn predecessors(&self, label: &str) -> Vec<(&str, f64)> {
        self.task_id(label)
            .map(|id| {
                self.incoming(id)
                    .map(|e| (self.name(e.from), e.duration))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Zero for unknown labels.
    pub fn in_degree(&self, label: &str) -> usize {
        self.task_id(label)
            .map_or(0, |id| self.in_degree[id as usize])
    }
}
