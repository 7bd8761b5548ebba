//! sir-rs: SIR Epidemic Simulation
//!
//! Numerical simulation of a Susceptible-Infected-Recovered epidemic in a
//! closed population: integrate the ODE system over a time horizon, then
//! locate the peak of the infection curve.
//!
//! # Architecture
//!
//! sir-rs is built on two core principles:
//!
//! 1. **Separation of Dynamics and Numerics**
//!    - Compartmental models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Extensibility and Type Safety**
//!    - Trait-based design for easy extension
//!    - Compartments are typed identifiers, not bare indices
//!    - Typed errors for every failure
//!
//! # Quick Start
//!
//! ```rust
//! use sir_rs::prelude::*;
//!
//! # fn main() -> Result<(), SimulationError> {
//! // 1. Configure model and scenario (reference run)
//! let scenario = Scenario::new(Box::new(SirModel::new(SirParameters::default())));
//!
//! // 2. Configure solver: 365 points over [0, 365] days
//! let config = SolverConfiguration::adaptive(TimeGrid::reference());
//!
//! // 3. Run simulation
//! let result = Dopri5Solver::new().solve(&scenario, &config)?;
//!
//! // 4. Analyse
//! let summary = EpidemicSummary::from_result(&result)?;
//! println!("{}", summary.peak_announcement());
//! assert!(summary.peak_fraction() < 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dynamics`]: Compartmental model trait and state types
//! - [`models`]: The SIR model and its parameters
//! - [`solver`]: Numerical solvers (methods), grid, scenario, results
//! - [`analysis`]: Peak extraction and run summary
//! - [`config`]: YAML run configuration
//! - [`error`]: Error type

// Core modules
pub mod dynamics;
pub mod error;

pub mod analysis;
pub mod config;
pub mod models;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use sir_rs::prelude::*;
    //! ```
    pub use crate::analysis::{EpidemicSummary, PeakRecord, find_peak};
    pub use crate::config::SimulationConfig;
    pub use crate::dynamics::{Compartment, CompartmentState, CompartmentalModel};
    pub use crate::error::{SimResult, SimulationError};
    pub use crate::models::{SirModel, SirParameters};
    pub use crate::solver::{
        Dopri5Solver, EulerSolver, RK4Solver, Scenario, SimulationResult, Solver,
        SolverConfiguration, SolverType, TimeGrid,
    };
}
