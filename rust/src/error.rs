//! Error types for graph construction, analysis and scheduling.

use thiserror::Error;

use crate::parse::ParseError;

/// Result type for scheduling pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the scheduling pipeline.
///
/// None of these are retryable: each one means the input is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A negative or non-finite duration was supplied for an activity.
    #[error("Invalid duration {duration} on edge {from} -> {to}")]
    InvalidDuration {
        from: String,
        to: String,
        duration: f64,
    },

    /// The precedence graph could not be linearized.
    #[error("Cyclic precedence graph: only {ordered} of {total} tasks could be ordered")]
    CyclicGraph { ordered: usize, total: usize },

    /// Machine count below one.
    #[error("Invalid machine count: {0} (at least one machine is required)")]
    InvalidMachineCount(usize),

    /// A query referenced a task absent from the built graph.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// The same (from, to) pair was inserted twice under the reject policy.
    #[error("Duplicate edge {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    /// A day offset that does not land on a representable calendar date.
    #[error("Date out of range: {days} days from the project start")]
    DateOutOfRange { days: f64 },

    /// A topological order that does not belong to the graph it is used with.
    #[error("Order does not match graph: {0}")]
    MismatchedOrder(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
