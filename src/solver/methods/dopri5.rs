//! Dormand-Prince 5(4) adaptive solver
//!
//! # Mathematical Background
//!
//! An embedded explicit Runge-Kutta pair: seven stages give a fifth-order
//! solution y₅ and, at no extra cost, a fourth-order solution y₄. Their
//! difference estimates the local error of the step:
//!
//! ```text
//! kᵢ  = f(tₙ + cᵢ·h, yₙ + h·Σⱼ aᵢⱼ·kⱼ)        i = 1..7
//! y₅  = yₙ + h·Σᵢ bᵢ·kᵢ                        (propagated)
//! err = h·Σᵢ eᵢ·kᵢ                             (e = b - b̂)
//! ```
//!
//! The last stage is evaluated at (tₙ + h, y₅), so it is the first stage of
//! the next step (FSAL): an accepted step costs six evaluations.
//!
//! # Step Size Control
//!
//! With `scᵢ = atol + rtol·max(|yₙ,ᵢ|, |y₅,ᵢ|)` the error norm is
//!
//! ```text
//! ‖err‖ = sqrt( mean( (errᵢ / scᵢ)² ) )
//! ```
//!
//! A step is accepted when ‖err‖ ≤ 1. The next step is
//! `h·clamp(0.9·‖err‖^(-1/5), 0.2, 10)`, without growth right after a
//! rejection. Steps are shortened to land exactly on each grid point, so the
//! reported states are integrated values, not interpolants.
//!
//! # Characteristics
//!
//! - **Order**: 5 (error estimate of order 4)
//! - **Complexity**: 6 function evaluations per attempted step
//! - **Accuracy**: set by `rtol`/`atol`, independent of the grid spacing

use log::{debug, info};
use nalgebra::DVector;

use crate::dynamics::{CompartmentState, CompartmentalModel};
use crate::error::{SimResult, SimulationError};
use crate::solver::{
    Scenario, SimulationResult, Solver, SolverConfiguration, SolverStatistics, SolverType,
    TrajectoryRecorder, check_finite, validate_state,
};

// =================================================================================================
// Butcher Tableau
// =================================================================================================

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;

const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;

const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;

const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;

const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the seventh stage row)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth minus fourth order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// =================================================================================================
// Step Control Constants
// =================================================================================================

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Steps this close to the remaining distance are stretched onto the grid point
const STRETCH: f64 = 1.01;

// =================================================================================================
// Dormand-Prince Solver
// =================================================================================================

/// Adaptive Dormand-Prince 5(4) solver
///
/// Requires an [`Adaptive`](SolverType::Adaptive) configuration. The
/// defaults (`rtol = atol = 1.49012e-8`, 500 steps per grid interval) are
/// those of the classic LSODA driver.
///
/// # Example
///
/// ```rust
/// use sir_rs::dynamics::Compartment;
/// use sir_rs::models::SirModel;
/// use sir_rs::solver::{Dopri5Solver, Scenario, Solver, SolverConfiguration, TimeGrid};
///
/// let scenario = Scenario::new(Box::new(SirModel::default()));
/// let config = SolverConfiguration::adaptive(TimeGrid::reference());
///
/// let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();
/// let peak = result.peak(Compartment::Infected).unwrap();
///
/// assert!(peak.index > 0 && peak.index < 364);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dopri5Solver;

/// Outcome of one attempted step
struct Attempt {
    state: DVector<f64>,
    last_stage: DVector<f64>,
    error_norm: f64,
}

impl Dopri5Solver {
    /// Create a new Dormand-Prince solver
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the model on raw values
    fn derivative(
        model: &dyn CompartmentalModel,
        template: &CompartmentState,
        t: f64,
        values: DVector<f64>,
    ) -> DVector<f64> {
        model
            .compute_derivatives(t, &template.with_values(values))
            .into_values()
    }

    /// Attempt one step of size `h` from `(t, y)` with first stage `k1`
    #[allow(clippy::too_many_arguments)]
    fn attempt(
        model: &dyn CompartmentalModel,
        template: &CompartmentState,
        t: f64,
        y: &DVector<f64>,
        k1: &DVector<f64>,
        h: f64,
        rtol: f64,
        atol: f64,
    ) -> Attempt {
        let k2 = Self::derivative(model, template, t + C2 * h, y + k1 * (A21 * h));

        let k3 = Self::derivative(
            model,
            template,
            t + C3 * h,
            y + (k1 * A31 + &k2 * A32) * h,
        );

        let k4 = Self::derivative(
            model,
            template,
            t + C4 * h,
            y + (k1 * A41 + &k2 * A42 + &k3 * A43) * h,
        );

        let k5 = Self::derivative(
            model,
            template,
            t + C5 * h,
            y + (k1 * A51 + &k2 * A52 + &k3 * A53 + &k4 * A54) * h,
        );

        let k6 = Self::derivative(
            model,
            template,
            t + h,
            y + (k1 * A61 + &k2 * A62 + &k3 * A63 + &k4 * A64 + &k5 * A65) * h,
        );

        let state = y + (k1 * B1 + &k3 * B3 + &k4 * B4 + &k5 * B5 + &k6 * B6) * h;

        let k7 = Self::derivative(model, template, t + h, state.clone());

        let error = (k1 * E1 + &k3 * E3 + &k4 * E4 + &k5 * E5 + &k6 * E6 + &k7 * E7) * h;

        let error_norm = rms_norm(y.iter().zip(state.iter()).zip(error.iter()).map(
            |((y0, y1), e)| e / (atol + rtol * y0.abs().max(y1.abs())),
        ));

        Attempt {
            state,
            last_stage: k7,
            error_norm,
        }
    }

    /// Initial step size (Hairer, Nørsett & Wanner, II.4)
    #[allow(clippy::too_many_arguments)]
    fn initial_step(
        model: &dyn CompartmentalModel,
        template: &CompartmentState,
        t: f64,
        y: &DVector<f64>,
        f0: &DVector<f64>,
        span: f64,
        rtol: f64,
        atol: f64,
        statistics: &mut SolverStatistics,
    ) -> f64 {
        let scale: Vec<f64> = y.iter().map(|v| atol + rtol * v.abs()).collect();

        let d0 = rms_norm(y.iter().zip(&scale).map(|(v, s)| v / s));
        let d1 = rms_norm(f0.iter().zip(&scale).map(|(v, s)| v / s));

        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        }
        .min(span);

        let f1 = Self::derivative(model, template, t + h0, y + f0 * h0);
        statistics.function_evaluations += 1;

        let d2 = rms_norm(
            f1.iter()
                .zip(f0.iter())
                .zip(&scale)
                .map(|((a, b), s)| (a - b) / s),
        ) / h0;

        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };

        (100.0 * h0).min(h1).min(span)
    }
}

/// Root mean square of an iterator of scaled components
fn rms_norm(components: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = components.fold((0.0, 0usize), |(sum, count), x| (sum + x * x, count + 1));
    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

/// Smallest step that still moves `t` in floating point
fn min_step(t: f64) -> f64 {
    16.0 * f64::EPSILON * t.abs().max(1.0)
}

impl Solver for Dopri5Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> SimResult<SimulationResult> {
        // ====== Step 1: Validation ======

        let (rtol, atol, max_steps) = match &config.solver_type {
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => (*relative_tolerance, *absolute_tolerance, *max_steps),
            other => {
                return Err(SimulationError::UnsupportedConfiguration {
                    solver: self.name(),
                    expected: "Adaptive",
                    requested: other.name().to_string(),
                });
            }
        };

        config.validate()?;
        scenario.validate()?;

        // ====== Step 2: Setup ======

        let grid = &config.grid;
        let model = scenario.model.as_ref();
        let template = &scenario.initial_state;

        info!(
            "{}: integrating {} over {} (rtol={:e}, atol={:e})",
            self.name(),
            scenario.get_model_name(),
            grid,
            rtol,
            atol
        );

        let mut recorder = TrajectoryRecorder::new(grid, template.len());
        let mut statistics = SolverStatistics::default();

        recorder.record(template);

        let mut t = grid.start();
        let mut y = template.values().clone();

        if grid.len() > 1 {
            // ====== Step 3: Time Integration ======

            let mut k1 = Self::derivative(model, template, t, y.clone());
            statistics.function_evaluations += 1;
            check_finite(&template.with_values(k1.clone()), 0, t)?;

            let mut h = Self::initial_step(
                model,
                template,
                t,
                &y,
                &k1,
                grid.end() - t,
                rtol,
                atol,
                &mut statistics,
            );

            for (t_start, target) in grid.intervals() {
                let mut attempts = 0;
                let mut just_rejected = false;

                while t < target {
                    if attempts >= max_steps {
                        return Err(SimulationError::StepLimitExceeded {
                            max_steps,
                            from: t_start,
                            to: target,
                        });
                    }
                    if h < min_step(t) {
                        return Err(SimulationError::StepSizeUnderflow { time: t, step_size: h });
                    }

                    let remaining = target - t;
                    let lands = h * STRETCH >= remaining;
                    let step = if lands { remaining } else { h };

                    let attempt = Self::attempt(model, template, t, &y, &k1, step, rtol, atol);
                    statistics.function_evaluations += 6;
                    attempts += 1;

                    // Non-finite stages end the run here; a NaN norm would otherwise poison h
                    if !attempt.error_norm.is_finite() {
                        let step_index = statistics.accepted_steps + 1;
                        let reached = t + step;
                        check_finite(
                            &template.with_values(attempt.state.clone()),
                            step_index,
                            reached,
                        )?;
                        check_finite(
                            &template.with_values(attempt.last_stage.clone()),
                            step_index,
                            reached,
                        )?;
                        if attempt.error_norm.is_nan() {
                            return Err(SimulationError::NotANumber {
                                compartment: "error estimate".to_string(),
                                time: reached,
                                step: step_index,
                            });
                        }
                    }

                    if attempt.error_norm <= 1.0 {
                        // ====== Accepted ======

                        t = if lands { target } else { t + step };
                        y = attempt.state;
                        k1 = attempt.last_stage;
                        statistics.accepted_steps += 1;

                        validate_state(
                            &template.with_values(y.clone()),
                            statistics.accepted_steps,
                            t,
                            config.negativity_tolerance,
                        )?;

                        let mut factor = if attempt.error_norm == 0.0 {
                            MAX_FACTOR
                        } else {
                            (SAFETY * attempt.error_norm.powf(ERROR_EXPONENT))
                                .clamp(MIN_FACTOR, MAX_FACTOR)
                        };
                        if just_rejected {
                            factor = factor.min(1.0);
                        }
                        h = step * factor;
                        just_rejected = false;
                    } else {
                        // ====== Rejected ======

                        let factor = (SAFETY * attempt.error_norm.powf(ERROR_EXPONENT))
                            .clamp(MIN_FACTOR, 1.0);

                        debug!(
                            "{}: rejected step h={:.3e} at t={} (error norm {:.3})",
                            self.name(),
                            step,
                            t,
                            attempt.error_norm
                        );

                        statistics.rejected_steps += 1;
                        h = step * factor;
                        just_rejected = true;
                    }
                }

                recorder.record(&template.with_values(y.clone()));
            }
        }

        debug!(
            "{}: {} accepted, {} rejected, {} evaluations",
            self.name(),
            statistics.accepted_steps,
            statistics.rejected_steps,
            statistics.function_evaluations
        );

        // ====== Step 4: Build Result ======

        let final_state = template.with_values(y);
        let mut result = recorder.finish(final_state, statistics)?;

        result.add_metadata("solver", "Dormand-Prince 5(4)");
        result.add_metadata("model", scenario.get_model_name());
        result.add_metadata("relative tolerance", &rtol.to_string());
        result.add_metadata("absolute tolerance", &atol.to_string());
        result.add_metadata("time points", &grid.len().to_string());
        result.add_metadata(
            "function evaluations",
            &statistics.function_evaluations.to_string(),
        );

        info!("{}: done, final state {}", self.name(), result.final_state);

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince 5(4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
