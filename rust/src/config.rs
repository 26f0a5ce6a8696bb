//! Configuration types for the scheduling pipeline.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// What to do when the same (from, to) pair is inserted more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateEdgePolicy {
    /// The later duration replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail with [`Error::DuplicateEdge`].
    Reject,
    /// Parallel activities: durations are added together.
    Sum,
}

impl FromStr for DuplicateEdgePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            "sum" => Ok(Self::Sum),
            other => Err(Error::Parse(crate::parse::ParseError::UnknownPolicy(
                other.to_string(),
            ))),
        }
    }
}

impl fmt::Display for DuplicateEdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Overwrite => "overwrite",
            Self::Reject => "reject",
            Self::Sum => "sum",
        };
        f.write_str(name)
    }
}

/// Configuration for one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Number of parallel machines available to the scheduler (M >= 1).
    pub machines: usize,
    /// Handling of repeated (from, to) pairs during graph construction.
    pub duplicate_policy: DuplicateEdgePolicy,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            machines: 1,
            duplicate_policy: DuplicateEdgePolicy::default(),
            verbosity: 0,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with the given machine count.
    pub fn with_machines(machines: usize) -> Self {
        Self {
            machines,
            ..Self::default()
        }
    }
}
