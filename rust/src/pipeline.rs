//! End-to-end pipeline: graph, order, levels, timing and schedule.

use crate::config::PipelineConfig;
use crate::critical_path::TimingAnalysis;
use crate::error::Result;
use crate::graph::{EdgeSpec, Graph, GraphBuilder};
use crate::levels::Levels;
use crate::log_changes;
use crate::parse::parse_edge_list;
use crate::scheduler::{MachineScheduler, Schedule};
use crate::topological::{topological_sort, TopologicalOrder};

/// Every artifact of one run. Either all of them are produced or the run fails.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub graph: Graph,
    pub order: TopologicalOrder,
    pub levels: Levels,
    pub timing: TimingAnalysis,
    pub schedule: Schedule,
}

impl PipelineResult {
    /// Topological order as labels.
    pub fn order_labels(&self) -> Vec<&str> {
        self.order.labels(&self.graph)
    }

    /// Critical path as labeled triples.
    pub fn critical_path_labels(&self) -> Vec<(&str, &str, f64)> {
        self.timing
            .critical_path()
            .iter()
            .map(|e| (self.graph.name(e.from), self.graph.name(e.to), e.duration))
            .collect()
    }
}

/// Runs the phases in dependency order.
pub struct Pipeline;

impl Pipeline {
    pub fn run<I, E>(edges: I, config: &PipelineConfig) -> Result<PipelineResult>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        let graph = Graph::build_with(edges, config.duplicate_policy, config.verbosity)?;
        Self::run_graph(graph, config)
    }

    /// Run over `edges` plus standalone `tasks`.
    ///
    /// Tasks are interned after every edge endpoint, so a label already
    /// mentioned by an edge keeps its position.
    pub fn run_with_tasks<I, E, T, S>(
        edges: I,
        tasks: T,
        config: &PipelineConfig,
    ) -> Result<PipelineResult>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GraphBuilder::new(config.duplicate_policy).verbosity(config.verbosity);
        for spec in edges {
            let spec = spec.into();
            builder.add_edge(&spec.from, &spec.to, spec.duration)?;
        }
        for task in tasks {
            builder.add_task(task.as_ref());
        }
        Self::run_graph(builder.build(), config)
    }

    /// Parse the plain-text edge list, then run.
    pub fn run_text(input: &str, config: &PipelineConfig) -> Result<PipelineResult> {
        let list = parse_edge_list(input, config.verbosity)?;
        Self::run_with_tasks(list.edges, list.tasks, config)
    }

    /// Run every phase over an already built graph.
    pub fn run_graph(graph: Graph, config: &PipelineConfig) -> Result<PipelineResult> {
        let verbosity = config.verbosity;
        log_changes!(
            verbosity,
            "Graph: {} tasks, {} edges",
            graph.len(),
            graph.edge_count()
        );

        let order = topological_sort(&graph, verbosity)?;
        let levels = Levels::from_order(&order);
        let timing = TimingAnalysis::analyze(&graph, &order, verbosity)?;
        let schedule = MachineScheduler::new(&graph, &levels, config.machines)?
            .with_verbosity(verbosity)
            .schedule()?;
        log_changes!(verbosity, "Cmax: {}", schedule.cmax());

        Ok(PipelineResult {
            graph,
            order,
            levels,
            timing,
            schedule,
        })
    }
}
