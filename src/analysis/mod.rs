//! Trajectory analysis
//!
//! Post-processing of a [`SimulationResult`](crate::solver::SimulationResult):
//!
//! - [`find_peak`] / [`PeakRecord`]: first maximum of a series
//! - [`EpidemicSummary`]: peak, final sizes and attack rate of an SIR run
//!
//! Nothing here integrates anything; every function reads a finished
//! trajectory.

mod peak;
mod summary;

pub use peak::{PeakRecord, find_peak};
pub use summary::EpidemicSummary;
