//! PyO3 bindings for the scheduling pipeline.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::calendar::offset_date;
use crate::config::{DuplicateEdgePolicy, PipelineConfig};
use crate::critical_path::activity_lanes;
use crate::error::Error;
use crate::graph::EdgeSpec;
use crate::parse;
use crate::pipeline::{Pipeline, PipelineResult};

fn to_py_err(err: Error) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

/// Result of a pipeline run, flattened to plain data.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    #[pyo3(get)]
    pub order: Vec<String>,
    #[pyo3(get)]
    pub levels: HashMap<String, usize>,
    #[pyo3(get)]
    pub earliest_start: HashMap<String, f64>,
    #[pyo3(get)]
    pub latest_start: HashMap<String, f64>,
    #[pyo3(get)]
    pub slack: HashMap<String, f64>,
    #[pyo3(get)]
    pub makespan: f64,
    #[pyo3(get)]
    pub critical_path: Vec<(String, String, f64)>,
    /// Gantt bars: (from, to, start, finish, lane)
    #[pyo3(get)]
    pub activity_lanes: Vec<(String, String, f64, f64, usize)>,
    #[pyo3(get)]
    pub slots: Vec<Vec<String>>,
    #[pyo3(get)]
    pub cmax: usize,
}

#[pymethods]
impl PipelineReport {
    /// Slot `i` mapped onto day `start + i`.
    ///
    /// # Raises
    /// * ValueError if a slot falls past the last representable date
    fn calendar(&self, start: NaiveDate) -> PyResult<Vec<(NaiveDate, Vec<String>)>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let day = offset_date(start, i as f64).map_err(to_py_err)?;
                Ok((day, slot.clone()))
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "PipelineReport(tasks={}, makespan={}, cmax={})",
            self.order.len(),
            self.makespan,
            self.cmax
        )
    }
}

impl From<&PipelineResult> for PipelineReport {
    fn from(result: &PipelineResult) -> Self {
        let graph = &result.graph;
        let label = |id| graph.name(id).to_string();

        let mut report = PipelineReport {
            order: result.order.as_slice().iter().map(|&id| label(id)).collect(),
            makespan: result.timing.makespan(),
            critical_path: result
                .critical_path_labels()
                .into_iter()
                .map(|(from, to, d)| (from.to_string(), to.to_string(), d))
                .collect(),
            activity_lanes: activity_lanes(graph, &result.timing)
                .into_iter()
                .map(|b| (label(b.from), label(b.to), b.start, b.finish, b.lane))
                .collect(),
            slots: result
                .schedule
                .named_slots(graph)
                .into_iter()
                .map(|slot| slot.into_iter().map(str::to_string).collect())
                .collect(),
            cmax: result.schedule.cmax(),
            ..Default::default()
        };

        for id in graph.tasks() {
            let timing = result.timing.timing(id);
            report.levels.insert(label(id), result.levels.get(id));
            report.earliest_start.insert(label(id), timing.earliest_start);
            report.latest_start.insert(label(id), timing.latest_start);
            report.slack.insert(label(id), timing.slack);
        }
        report
    }
}

/// Run the full pipeline over precedence triples.
///
/// `extra_tasks` declares tasks that may appear on no edge.
///
/// # Raises
/// * ValueError on negative durations, cycles, duplicate edges under
///   "reject", an unknown policy, or a machine count below one
#[pyfunction]
#[pyo3(signature = (edges, machines, duplicate_policy="overwrite", verbosity=0, extra_tasks=None))]
fn run_pipeline(
    edges: Vec<(String, String, f64)>,
    machines: usize,
    duplicate_policy: &str,
    verbosity: u8,
    extra_tasks: Option<Vec<String>>,
) -> PyResult<PipelineReport> {
    let config = PipelineConfig {
        machines,
        duplicate_policy: duplicate_policy
            .parse::<DuplicateEdgePolicy>()
            .map_err(to_py_err)?,
        verbosity,
    };
    let edges = edges
        .into_iter()
        .map(|(from, to, duration)| EdgeSpec::new(from, to, duration));
    let result = Pipeline::run_with_tasks(edges, extra_tasks.unwrap_or_default(), &config)
        .map_err(to_py_err)?;
    Ok(PipelineReport::from(&result))
}

/// Parse the plain-text edge list into (from, to, duration) triples and
/// the labels declared on lines of their own.
#[pyfunction]
fn parse_edge_list(text: &str) -> PyResult<(Vec<(String, String, f64)>, Vec<String>)> {
    let list = parse::parse_edge_list(text, 0).map_err(|e| to_py_err(e.into()))?;
    let edges = list
        .edges
        .into_iter()
        .map(|e| (e.from, e.to, e.duration))
        .collect();
    Ok((edges, list.tasks))
}

/// The cpm_sched.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PipelineReport>()?;
    m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
    m.add_function(wrap_pyfunction!(parse_edge_list, m)?)?;
    Ok(())
}
