//! Numerical methods for solving differential equations
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Architecture
//!
//! The separation between abstract solver interface (`solver::traits`) and concrete
//! implementations (`solver::methods`) follows the Open-Closed Principle:
//! - **Open** for extension: Add new methods without modifying existing code
//! - **Closed** for modification: The `Solver` trait is stable
//!
//! # Available Methods
//!
//! All three are explicit methods, suitable for non-stiff ODEs such as SIR.
//!
//! - **[`Dopri5Solver`]**: Dormand-Prince 5(4), adaptive step size
//!   - Order: fifth-order solution, fourth-order embedded error estimate
//!   - Cost: 6 function evaluations per attempted step (FSAL)
//!   - Use: **default**; accuracy set by tolerances, not by step count
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!   - Use: reproducible fixed-cost runs, method comparison
//!
//! - **[`EulerSolver`]**: Forward Euler method
//!   - Order: First-order O(dt)
//!   - Cost: 1 function evaluation per step
//!   - Use: baselines and convergence studies
//!
//! # Example
//!
//! ```rust
//! use sir_rs::models::SirModel;
//! use sir_rs::solver::{Dopri5Solver, EulerSolver, RK4Solver};
//! use sir_rs::solver::{Scenario, Solver, SolverConfiguration, TimeGrid};
//!
//! fn main() -> Result<(), sir_rs::error::SimulationError> {
//!     let scenario = Scenario::new(Box::new(SirModel::default()));
//!     let grid = TimeGrid::linspace(0.0, 60.0, 61)?;
//!
//!     let adaptive = Dopri5Solver::new()
//!         .solve(&scenario, &SolverConfiguration::adaptive(grid.clone()))?;
//!
//!     let fixed = SolverConfiguration::fixed_step(grid, 10);
//!     let rk4 = RK4Solver::new().solve(&scenario, &fixed)?;
//!     let euler = EulerSolver::new().solve(&scenario, &fixed)?;
//!
//!     assert_eq!(adaptive.len(), rk4.len());
//!     assert_eq!(rk4.len(), euler.len());
//!     Ok(())
//! }
//! ```

mod dopri5;
mod euler;
mod rk4;

// Re-exports for convenience
pub use dopri5::Dopri5Solver;
pub use euler::EulerSolver;
pub use rk4::RK4Solver;

use crate::error::{SimResult, SimulationError};
use crate::solver::{SolverConfiguration, SolverType};

/// Substeps of a fixed-step configuration, or `UnsupportedConfiguration`
pub(super) fn fixed_step_substeps(
    config: &SolverConfiguration,
    solver: &'static str,
) -> SimResult<usize> {
    match &config.solver_type {
        SolverType::FixedStep { substeps } => Ok(*substeps),
        other => Err(SimulationError::UnsupportedConfiguration {
            solver,
            expected: "FixedStep",
            requested: other.name().to_string(),
        }),
    }
}

// =================================================================================================
// Test Models
// =================================================================================================
