//! Forward and backward passes over the activity-on-edge network.

use chrono::NaiveDate;

use crate::calendar::offset_date;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph};
use crate::interner::TaskId;
use crate::topological::TopologicalOrder;
use crate::{log_changes, log_debug};

use super::types::{TaskTiming, EPSILON, RELATIVE_EPSILON};

/// ES/LS/slack for every task, the makespan and one critical path.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingAnalysis {
    timings: Vec<TaskTiming>,
    makespan: f64,
    tolerance: f64,
    critical_path: Vec<Edge>,
}

impl TimingAnalysis {
    /// Run both passes and extract a critical path.
    ///
    /// # Returns
    /// * `Err(Error::MismatchedOrder)` if `order` is not a topological order
    ///   of `graph`
    pub fn analyze(graph: &Graph, order: &TopologicalOrder, verbosity: u8) -> Result<Self> {
        check_order(graph, order)?;

        let earliest = forward_pass(graph, order);
        let makespan = earliest.iter().copied().fold(0.0, f64::max);
        let latest = backward_pass(graph, order, makespan);
        let tolerance = tolerance_for(makespan);

        let timings: Vec<TaskTiming> = earliest
            .iter()
            .zip(&latest)
            .map(|(&earliest_start, &latest_start)| {
                let slack = latest_start - earliest_start;
                // Rounding in the backward pass leaves residue on zero-slack tasks
                if slack.abs() <= tolerance {
                    TaskTiming {
                        earliest_start,
                        latest_start: earliest_start,
                        slack: 0.0,
                    }
                } else {
                    TaskTiming {
                        earliest_start,
                        latest_start,
                        slack,
                    }
                }
            })
            .collect();

        for id in graph.tasks() {
            let t = &timings[id as usize];
            log_debug!(
                verbosity,
                "  {}: ES={} LS={} slack={}",
                graph.name(id),
                t.earliest_start,
                t.latest_start,
                t.slack
            );
        }

        let critical_path = extract_critical_path(graph, order, &timings, tolerance);
        log_changes!(
            verbosity,
            "Makespan: {} (critical path of {} edges)",
            makespan,
            critical_path.len()
        );

        Ok(Self {
            timings,
            makespan,
            tolerance,
            critical_path,
        })
    }

    /// Maximum ES over all tasks.
    pub fn makespan(&self) -> f64 {
        self.makespan
    }

    /// Absolute tolerance used for zero-slack and tight-edge comparisons.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Critical path edges from a source to a sink.
    pub fn critical_path(&self) -> &[Edge] {
        &self.critical_path
    }

    /// Sum of durations along the reported critical path.
    pub fn critical_path_length(&self) -> f64 {
        self.critical_path.iter().map(|e| e.duration).sum()
    }

    /// Timing records indexed by task ID.
    pub fn timings(&self) -> &[TaskTiming] {
        &self.timings
    }

    pub fn timing(&self, id: TaskId) -> &TaskTiming {
        &self.timings[id as usize]
    }

    /// Timing record by label.
    pub fn record(&self, graph: &Graph, label: &str) -> Result<TaskTiming> {
        graph.require(label).map(|id| self.timings[id as usize])
    }

    pub fn earliest_start(&self, graph: &Graph, label: &str) -> Result<f64> {
        self.record(graph, label).map(|t| t.earliest_start)
    }

    pub fn latest_start(&self, graph: &Graph, label: &str) -> Result<f64> {
        self.record(graph, label).map(|t| t.latest_start)
    }

    pub fn slack(&self, graph: &Graph, label: &str) -> Result<f64> {
        self.record(graph, label).map(|t| t.slack)
    }

    pub fn is_critical(&self, graph: &Graph, label: &str) -> Result<bool> {
        self.record(graph, label).map(|t| t.is_critical())
    }

    /// ES projected onto the calendar, rounding fractional days up.
    ///
    /// # Returns
    /// * `Err(Error::DateOutOfRange)` if the date is not representable
    pub fn earliest_start_date(
        &self,
        graph: &Graph,
        label: &str,
        project_start: NaiveDate,
    ) -> Result<NaiveDate> {
        let es = self.earliest_start(graph, label)?;
        offset_date(project_start, es)
    }
}

/// Absolute tolerance grown with the magnitude of the schedule.
fn tolerance_for(makespan: f64) -> f64 {
    EPSILON.max(makespan.abs() * RELATIVE_EPSILON)
}

/// `order` must rank every task of `graph` and respect every edge.
fn check_order(graph: &Graph, order: &TopologicalOrder) -> Result<()> {
    if order.len() != graph.len() {
        return Err(Error::MismatchedOrder(format!(
            "order has {} tasks, graph has {}",
            order.len(),
            graph.len()
        )));
    }
    for edge in graph.edges() {
        if order.rank(edge.from) >= order.rank(edge.to) {
            return Err(Error::MismatchedOrder(format!(
                "{} is not ordered before {}",
                graph.name(edge.from),
                graph.name(edge.to)
            )));
        }
    }
    Ok(())
}

/// ES(n) = max over inbound edges (t, n, d) of ES(t) + d.
fn forward_pass(graph: &Graph, order: &TopologicalOrder) -> Vec<f64> {
    let mut earliest = vec![0.0; graph.len()];
    for &task in order.as_slice() {
        let start = earliest[task as usize];
        for edge in graph.successors(task) {
            let finish = start + edge.duration;
            if finish > earliest[edge.to as usize] {
                earliest[edge.to as usize] = finish;
            }
        }
    }
    earliest
}

/// LS(t) = min over outbound edges (t, n, d) of LS(n) - d, starting from makespan.
fn backward_pass(graph: &Graph, order: &TopologicalOrder, makespan: f64) -> Vec<f64> {
    let mut latest = vec![makespan; graph.len()];
    for &task in order.as_slice().iter().rev() {
        for edge in graph.successors(task) {
            let required = latest[edge.to as usize] - edge.duration;
            if required < latest[task as usize] {
                latest[task as usize] = required;
            }
        }
    }
    latest
}

/// Walk zero-slack, tight edges from the first critical source to a sink.
///
/// Ties go to the first qualifying outgoing edge in insertion order.
fn extract_critical_path(
    graph: &Graph,
    order: &TopologicalOrder,
    timings: &[TaskTiming],
    tolerance: f64,
) -> Vec<Edge> {
    let in_degree = graph.in_degrees();
    let Some(mut current) = order
        .as_slice()
        .iter()
        .copied()
        .find(|&id| in_degree[id as usize] == 0 && timings[id as usize].is_critical())
    else {
        return Vec::new();
    };

    let mut path = Vec::new();
    loop {
        let from = timings[current as usize].earliest_start;
        let next = graph.successors(current).find(|edge| {
            let to = &timings[edge.to as usize];
            to.is_critical() && (from + edge.duration - to.earliest_start).abs() <= tolerance
        });

        match next {
            Some(edge) => {
                path.push(*edge);
                current = edge.to;
            }
            None => break,
        }
    }
    path
}
