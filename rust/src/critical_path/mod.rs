//! Timing analysis of the activity-on-edge network.
//!
//! A forward pass computes earliest starts and the makespan, a backward pass
//! computes latest starts, and one zero-slack chain is reported as the
//! critical path.

mod calculation;
mod lanes;
mod types;

pub use calculation::TimingAnalysis;
pub use lanes::{activity_lanes, lane_count};
pub use types::{ActivityBar, TaskTiming, EPSILON, RELATIVE_EPSILON};
