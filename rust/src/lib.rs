//! Precedence-constrained task scheduling core.
//!
//! Given an activity-on-edge project network this crate computes a
//! topological order, an earliest/latest start timing analysis with a
//! critical path, and a bounded-machine slot schedule.
//!
//! Data flows strictly forward:
//! graph -> topological order -> levels -> {timing analysis, machine schedule}.

pub mod calendar;
pub mod config;
pub mod critical_path;
pub mod error;
pub mod graph;
mod interner;
pub mod levels;
pub mod logging;
pub mod parse;
pub mod pipeline;
pub mod scheduler;
pub mod topological;

#[cfg(feature = "python")]
mod python;

pub use config::{DuplicateEdgePolicy, PipelineConfig};
pub use critical_path::{activity_lanes, ActivityBar, TaskTiming, TimingAnalysis};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeSpec, Graph, GraphBuilder};
pub use interner::TaskId;
pub use levels::Levels;
pub use parse::{parse_edge_list, EdgeList, ParseError};
pub use pipeline::{Pipeline, PipelineResult};
pub use scheduler::{MachineScheduler, Schedule};
pub use topological::{topological_sort, TopologicalOrder};
