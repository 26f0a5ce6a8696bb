//! Machine scheduler: bounded list scheduling over unit time slots.
//!
//! Packs ready tasks onto a fixed number of machines, respecting precedence
//! and level order. Machines and slots are modeled resources, not real
//! concurrent execution.

mod core;
mod schedule;
mod state;

pub use core::MachineScheduler;
pub use schedule::Schedule;
pub use state::SchedulerState;
