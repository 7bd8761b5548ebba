//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The Forward Euler method is the simplest explicit time-stepping scheme
//! for solving ordinary differential equations (ODEs):
//!
//! ```text
//! dy/dt = f(t, y)
//! ```
//!
//! The scheme approximates the solution at time t_{n+1} = t_n + dt using:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(t_n, y_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (error ~ O(dt))
//! - **Stability**: Conditionally stable (requires small time steps)
//! - **Complexity**: 1 function evaluation per step
//! - **Memory**: O(1) - only stores current state
//!
//! # Limitations
//!
//! ⚠️ First-order accuracy only (needs small dt for precision)
//! ⚠️ Stability restrictions (|1 + λ·dt| ≤ 1 for dy/dt = λy)
//! ⚠️ Large steps overshoot S below zero in fast epidemics
//!
//! # When to Use
//!
//! - Baselines for method comparison
//! - Convergence studies
//! - Quick exploratory simulations

use log::{debug, info};

use crate::error::SimResult;
use crate::solver::methods::fixed_step_substeps;
use crate::solver::{
    Scenario, SimulationResult, Solver, SolverConfiguration, SolverStatistics,
    TrajectoryRecorder, validate_state,
};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// Implements the simplest explicit time integration scheme:
/// y_{n+1} = y_n + dt * f(t_n, y_n)
///
/// # Algorithm
///
/// For each grid interval [t_k, t_{k+1}]:
///
/// 1. dt = (t_{k+1} - t_k) / substeps
/// 2. For each substep j: k = f(t_k + j·dt, y), y ← y + dt·k
/// 3. Store y as row k+1 of the trajectory
///
/// Substep times are computed from the interval start, never by accumulating
/// dt, so the state reported for t_{k+1} really belongs to t_{k+1}.
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt²) per step
/// - **Global error**: O(dt) after T/dt steps
/// - **Convergence**: Doubling the substeps halves the error
///
/// # Example
///
/// ```rust
/// use sir_rs::models::SirModel;
/// use sir_rs::solver::{EulerSolver, Scenario, Solver, SolverConfiguration, TimeGrid};
///
/// let scenario = Scenario::new(Box::new(SirModel::default()));
/// let grid = TimeGrid::linspace(0.0, 30.0, 31).unwrap();
///
/// let result = EulerSolver::new()
///     .solve(&scenario, &SolverConfiguration::fixed_step(grid, 20))
///     .unwrap();
///
/// assert_eq!(result.statistics.function_evaluations, 30 * 20);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> SimResult<SimulationResult> {
        // ====== Step 1: Validation ======

        let substeps = fixed_step_substeps(config, self.name())?;
        config.validate()?;
        scenario.validate()?;

        // ====== Step 2: Setup ======

        let grid = &config.grid;
        let model = scenario.model.as_ref();

        info!(
            "{}: integrating {} over {} ({} substeps per interval)",
            self.name(),
            scenario.get_model_name(),
            grid,
            substeps
        );

        let mut state = scenario.initial_state.clone();
        let mut recorder = TrajectoryRecorder::new(grid, state.len());
        let mut statistics = SolverStatistics::default();

        recorder.record(&state);

        // ====== Step 3: Time Integration ======

        for (t_start, t_end) in grid.intervals() {
            let dt = (t_end - t_start) / substeps as f64;

            for j in 0..substeps {
                let t = t_start + j as f64 * dt;

                let derivative = model.compute_derivatives(t, &state);
                state = state + derivative * dt;

                statistics.function_evaluations += 1;
                statistics.accepted_steps += 1;

                validate_state(
                    &state,
                    statistics.accepted_steps,
                    t + dt,
                    config.negativity_tolerance,
                )?;
            }

            recorder.record(&state);
        }

        debug!(
            "{}: {} steps, {} evaluations",
            self.name(),
            statistics.accepted_steps,
            statistics.function_evaluations
        );

        // ====== Step 4: Build Result ======

        let mut result = recorder.finish(state, statistics)?;

        result.add_metadata("solver", self.name());
        result.add_metadata("model", scenario.get_model_name());
        result.add_metadata("substeps", &substeps.to_string());
        result.add_metadata("time points", &grid.len().to_string());
        result.add_metadata(
            "function evaluations",
            &statistics.function_evaluations.to_string(),
        );

        info!("{}: done, final state {}", self.name(), result.final_state);

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
