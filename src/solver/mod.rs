//! Numerical solvers
//!
//! This module provides traits and implementations for numerical solvers.
//! A numerical solver applies a numerical method to integrate the equations
//! provided by a compartmental model within a specific scenario.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Compartmental model (equations)
//!    - Initial state
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Output time grid (`TimeGrid`)
//!    - Solver type (fixed step or adaptive) and its parameters
//!    - Negativity tolerance
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - Applies the numerical scheme
//!    - Returns the trajectory sampled on the grid
//!    - Independent of epidemiology
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SolverType`, `SolverConfiguration`,
//!   `SimulationResult`, `SolverStatistics`
//! - **`grid`**: `TimeGrid`, the output times
//! - **`scenario`**: `Scenario`, model + initial state
//! - **`methods`**: `Dopri5Solver`, `RK4Solver`, `EulerSolver`
//!
//! # Quick Start Example
//!
//! ```rust
//! use sir_rs::models::{SirModel, SirParameters};
//! use sir_rs::solver::{Dopri5Solver, Scenario, Solver, SolverConfiguration, TimeGrid};
//! use sir_rs::dynamics::Compartment;
//!
//! # fn main() -> Result<(), sir_rs::error::SimulationError> {
//! // 1. Create scenario (WHAT to solve)
//! let model = SirModel::new(SirParameters::new(1000.0, 1.0, 0.1, 1.0));
//! let scenario = Scenario::new(Box::new(model));
//!
//! // 2. Create configuration (HOW to solve)
//! let grid = TimeGrid::linspace(0.0, 100.0, 101)?;
//! let config = SolverConfiguration::adaptive(grid);
//!
//! // 3. Solve
//! let result = Dopri5Solver::new().solve(&scenario, &config)?;
//!
//! // 4. Access results
//! let peak = result.peak(Compartment::Infected)?;
//! assert!(peak.index > 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────────┐
//! │  Compartmental Model │  (equations)
//! └──────────┬───────────┘
//!            │
//!   ┌────────▼────────┐
//!   │ Scenario        │ ← WHAT to solve
//!   │ (model + y₀)    │
//!   └────────┬────────┘
//!            │
//!   ┌────────▼─────────────┐
//!   │ Solver Configuration │ ← HOW to solve
//!   │ (grid + type)        │
//!   └────────┬─────────────┘
//!            │
//!   ┌────────▼────────────┐
//!   │ Numerical Solver    │ ← The method
//!   │ (Dopri5, RK4, Euler)│
//!   └────────┬────────────┘
//!            │
//!   ┌────────▼────────────┐
//!   │ Simulation Result   │ ← The solution
//!   │ (trajectory + meta) │
//!   └─────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! All solver methods return [`SimResult`]. Common errors:
//! - Invalid configuration (zero substeps, non-positive tolerances)
//! - Invalid scenario (bad parameters, initial state not matching the model)
//! - Numerical failure (NaN, infinity, negative compartment, step control)

// =================================================================================================
// Module Declarations
// =================================================================================================
mod grid;
mod methods;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    DEFAULT_MAX_STEPS, DEFAULT_NEGATIVITY_TOLERANCE, DEFAULT_TOLERANCE, SimulationResult,
    Solver, SolverConfiguration, SolverStatistics, SolverType,
};

pub use grid::TimeGrid;
pub use scenario::Scenario;

pub use methods::{Dopri5Solver, EulerSolver, RK4Solver};

// =================================================================================================
// Helper Functions
// =================================================================================================

use ndarray::{Array2, ArrayView1};

use crate::dynamics::CompartmentState;
use crate::error::{SimResult, SimulationError};

/// Validate a state for numerical issues
///
/// Checks that no compartment holds NaN or infinity and that no compartment
/// is below `-negativity_tolerance · max(1, |total|)`.
///
/// # Arguments
///
/// * `state` - State to validate
/// * `step` - Index of the step that produced it (for error reporting)
/// * `time` - Simulation time of the state
/// * `negativity_tolerance` - Relative bound on negative overshoot
///
/// # Example
///
/// ```rust,ignore
/// validate_state(&state, 42, 12.5, 1e-6)?;  // Validates state at step 42
/// ```
pub(crate) fn validate_state(
    state: &CompartmentState,
    step: usize,
    time: f64,
    negativity_tolerance: f64,
) -> SimResult<()> {
    check_finite(state, step, time)?;

    let tolerance = negativity_tolerance * state.total().abs().max(1.0);
    if let Some((compartment, value)) = state.iter().find(|(_, v)| *v < -tolerance) {
        return Err(SimulationError::NegativeCompartment {
            compartment: compartment.to_string(),
            value,
            time,
            tolerance,
        });
    }

    Ok(())
}

/// NaN and infinity checks only
///
/// Also used on derivatives, which may legitimately be negative.
pub(crate) fn check_finite(state: &CompartmentState, step: usize, time: f64) -> SimResult<()> {
    // NaN can arise from 0/0, Inf - Inf, or other undefined operations
    if let Some((compartment, _)) = state.iter().find(|(_, v)| v.is_nan()) {
        return Err(SimulationError::NotANumber {
            compartment: compartment.to_string(),
            time,
            step,
        });
    }

    // Inf can indicate overflow
    if let Some((compartment, _)) = state.iter().find(|(_, v)| v.is_infinite()) {
        return Err(SimulationError::Infinite {
            compartment: compartment.to_string(),
            time,
            step,
        });
    }

    Ok(())
}

/// Fills the trajectory matrix row by row, one row per grid point
///
/// The matrix is allocated once at `grid length × compartments`.
pub(crate) struct TrajectoryRecorder {
    time_points: Vec<f64>,
    trajectory: Array2<f64>,
    next_row: usize,
}

impl TrajectoryRecorder {
    pub(crate) fn new(grid: &TimeGrid, compartments: usize) -> Self {
        Self {
            time_points: grid.as_slice().to_vec(),
            trajectory: Array2::zeros((grid.len(), compartments)),
            next_row: 0,
        }
    }

    /// Store the state reached at the next grid point
    pub(crate) fn record(&mut self, state: &CompartmentState) {
        debug_assert!(self.next_row < self.time_points.len());
        self.trajectory
            .row_mut(self.next_row)
            .assign(&ArrayView1::from(state.values().as_slice()));
        self.next_row += 1;
    }

    pub(crate) fn finish(
        self,
        final_state: CompartmentState,
        statistics: SolverStatistics,
    ) -> SimResult<SimulationResult> {
        if self.next_row != self.time_points.len() {
            return Err(SimulationError::DimensionMismatch {
                expected: self.time_points.len(),
                actual: self.next_row,
            });
        }

        Ok(SimulationResult::new(self.time_points, self.trajectory, final_state)?
            .with_statistics(statistics))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
