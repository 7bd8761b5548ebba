//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method (RK4) uses a weighted
//! average of four slope estimates:
//!
//! ```text
//! k₁ = f(tₙ,        yₙ)
//! k₂ = f(tₙ + dt/2, yₙ + dt/2 * k₁)
//! k₃ = f(tₙ + dt/2, yₙ + dt/2 * k₂)
//! k₄ = f(tₙ + dt,   yₙ + dt * k₃)
//!
//! yₙ₊₁ = yₙ + dt/6 * (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (error ~ O(dt⁴))
//! - **Stability**: Larger stability region than Euler (~2.78× larger step)
//! - **Complexity**: 4 function evaluations per step
//! - **Memory**: O(1) - stores only k₁, k₂, k₃, k₄ intermediates
//!
//! # Comparison with Euler
//!
//! | Method | Order | Evals/Step | Error |
//! |--------|-------|------------|-------|
//! | Euler  | 1     | 1          | O(dt) |
//! | RK4    | 4     | 4          | O(dt⁴)|
//!
//! # When NOT to Use
//!
//! - Need error control → Use [`Dopri5Solver`](crate::solver::Dopri5Solver)
//! - Very stiff problems → Use implicit methods

use log::{debug, info};

use crate::error::SimResult;
use crate::solver::methods::fixed_step_substeps;
use crate::solver::{
    Scenario, SimulationResult, Solver, SolverConfiguration, SolverStatistics,
    TrajectoryRecorder, validate_state,
};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// Each grid interval is split into `substeps` equal RK4 steps; the state at
/// the end of the interval becomes the next trajectory row.
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt⁵) per step
/// - **Global error**: O(dt⁴) after T/dt steps
/// - **Convergence**: Halving dt reduces error by factor of 16
///
/// # Example
///
/// ```rust
/// use sir_rs::dynamics::Compartment;
/// use sir_rs::models::{SirModel, SirParameters};
/// use sir_rs::solver::{RK4Solver, Scenario, Solver, SolverConfiguration, TimeGrid};
///
/// let model = SirModel::new(SirParameters::new(1000.0, 1.0, 0.1, 1.0));
/// let scenario = Scenario::new(Box::new(model));
/// let grid = TimeGrid::linspace(0.0, 100.0, 101).unwrap();
///
/// let result = RK4Solver::new()
///     .solve(&scenario, &SolverConfiguration::fixed_step(grid, 10))
///     .unwrap();
///
/// let recovered = result.final_state.get(Compartment::Recovered).unwrap();
/// assert!(recovered > 900.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use sir_rs::solver::{RK4Solver, Solver};
    ///
    /// let solver = RK4Solver::new();
    /// assert_eq!(solver.name(), "Runge Kutta (RK4)");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
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

                // ====== RK4 Stages ======

                let k1 = model.compute_derivatives(t, &state);

                let state_k2 = state.clone() + k1.clone() * (dt / 2.0);
                let k2 = model.compute_derivatives(t + dt / 2.0, &state_k2);

                let state_k3 = state.clone() + k2.clone() * (dt / 2.0);
                let k3 = model.compute_derivatives(t + dt / 2.0, &state_k3);

                let state_k4 = state.clone() + k3.clone() * dt;
                let k4 = model.compute_derivatives(t + dt, &state_k4);

                // ====== RK4 Update ======

                // Simpson weights: 1/6 at the ends, 1/3 at the midpoint
                let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;
                state = state + weighted_slope * (dt / 6.0);

                statistics.function_evaluations += 4;
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

        result.add_metadata("solver", "Runge-Kutta 4");
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
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
