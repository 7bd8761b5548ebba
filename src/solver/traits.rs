//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - Central enum `SolverType` defines the family of time integration
//! - `SolverConfiguration` couples it with the output grid
//! - `SimulationResult` stores what every family produces: one state per
//!   grid point, plus statistics and metadata for extensibility
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: one entry point, `solve(scenario, configuration)`
//! - `SolverType` enum: EXTENSIBLE (new variants can be added)
//! - Core structures: STABLE (fields won't be removed)

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::analysis::{PeakRecord, find_peak};
use crate::dynamics::{Compartment, CompartmentState};
use crate::error::{SimResult, SimulationError};
use crate::solver::{Scenario, TimeGrid};

/// Default relative and absolute tolerance of the adaptive solver
///
/// Same value as the classic LSODA driver (`sqrt` of the double epsilon).
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

/// Default bound on internal steps between two output points
pub const DEFAULT_MAX_STEPS: usize = 500;

/// Default relative bound on negative overshoot
pub const DEFAULT_NEGATIVITY_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Central Solver Type Enumeration
// ============================================================================

/// Family of time integration
///
/// Each variant carries the data specific to that family. A solver accepts
/// exactly one family and rejects the others.
///
/// # Examples
///
/// ```rust
/// use sir_rs::solver::SolverType;
///
/// let fixed = SolverType::FixedStep { substeps: 10 };
/// assert_eq!(fixed.name(), "FixedStep");
///
/// let adaptive = SolverType::Adaptive {
///     relative_tolerance: 1e-8,
///     absolute_tolerance: 1e-8,
///     max_steps: 500,
/// };
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SolverType {
    /// Equal steps, `substeps` of them inside each grid interval
    ///
    /// Used by: Euler, RK4
    FixedStep { substeps: usize },

    /// Error-controlled steps, landing exactly on every grid point
    ///
    /// Used by: Dormand-Prince
    ///
    /// # Parameters
    /// - `relative_tolerance`, `absolute_tolerance`: per-component error scale
    ///   `atol + rtol·|y|`
    /// - `max_steps`: attempted steps allowed inside one grid interval
    Adaptive {
        relative_tolerance: f64,
        absolute_tolerance: f64,
        max_steps: usize,
    },
}

impl SolverType {
    /// Get name identifier
    pub fn name(&self) -> &'static str {
        match self {
            SolverType::FixedStep { .. } => "FixedStep",
            SolverType::Adaptive { .. } => "Adaptive",
        }
    }

    /// Validate that parameters are numerically meaningful
    pub fn validate(&self) -> SimResult<()> {
        match self {
            SolverType::FixedStep { substeps } => {
                if *substeps == 0 {
                    return Err(SimulationError::configuration(
                        "substeps must be greater than 0",
                    ));
                }
                Ok(())
            }
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => {
                if !relative_tolerance.is_finite() || *relative_tolerance <= 0.0 {
                    return Err(SimulationError::configuration(format!(
                        "relative tolerance must be positive, got {}",
                        relative_tolerance
                    )));
                }
                if !absolute_tolerance.is_finite() || *absolute_tolerance <= 0.0 {
                    return Err(SimulationError::configuration(format!(
                        "absolute tolerance must be positive, got {}",
                        absolute_tolerance
                    )));
                }
                if *max_steps == 0 {
                    return Err(SimulationError::configuration(
                        "maximum steps must be greater than 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverType::FixedStep { substeps } => write!(f, "FixedStep({} substeps)", substeps),
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => write!(
                f,
                "Adaptive(rtol={:e}, atol={:e}, max_steps={})",
                relative_tolerance, absolute_tolerance, max_steps
            ),
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for a numerical solver: HOW to solve
///
/// # Examples
///
/// ```rust
/// use sir_rs::solver::{SolverConfiguration, TimeGrid};
///
/// let grid = TimeGrid::linspace(0.0, 100.0, 101).unwrap();
///
/// // Dormand-Prince with default tolerances
/// let adaptive = SolverConfiguration::adaptive(grid.clone())
///     .with_tolerances(1e-10, 1e-6);
///
/// // RK4 / Euler, 20 steps per output interval
/// let fixed = SolverConfiguration::fixed_step(grid, 20);
///
/// assert!(adaptive.validate().is_ok());
/// assert!(fixed.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Times at which the state is reported
    pub grid: TimeGrid,

    /// Type of solver and its parameters
    pub solver_type: SolverType,

    /// Allowed negative overshoot, relative to `max(1, population)`
    pub negativity_tolerance: f64,
}

impl SolverConfiguration {
    /// Create a new configuration with a given solver type
    pub fn new(grid: TimeGrid, solver_type: SolverType) -> Self {
        Self {
            grid,
            solver_type,
            negativity_tolerance: DEFAULT_NEGATIVITY_TOLERANCE,
        }
    }

    /// Fixed-step configuration (Euler, RK4)
    pub fn fixed_step(grid: TimeGrid, substeps: usize) -> Self {
        Self::new(grid, SolverType::FixedStep { substeps })
    }

    /// Adaptive configuration with default tolerances and step limit
    pub fn adaptive(grid: TimeGrid) -> Self {
        Self::new(
            grid,
            SolverType::Adaptive {
                relative_tolerance: DEFAULT_TOLERANCE,
                absolute_tolerance: DEFAULT_TOLERANCE,
                max_steps: DEFAULT_MAX_STEPS,
            },
        )
    }

    /// Replace the tolerances of an adaptive configuration
    ///
    /// No effect on a fixed-step configuration.
    pub fn with_tolerances(mut self, relative: f64, absolute: f64) -> Self {
        if let SolverType::Adaptive {
            relative_tolerance,
            absolute_tolerance,
            ..
        } = &mut self.solver_type
        {
            *relative_tolerance = relative;
            *absolute_tolerance = absolute;
        }
        self
    }

    /// Replace the per-interval step limit of an adaptive configuration
    ///
    /// No effect on a fixed-step configuration.
    pub fn with_max_steps(mut self, limit: usize) -> Self {
        if let SolverType::Adaptive { max_steps, .. } = &mut self.solver_type {
            *max_steps = limit;
        }
        self
    }

    /// Replace the negativity tolerance
    pub fn with_negativity_tolerance(mut self, tolerance: f64) -> Self {
        self.negativity_tolerance = tolerance;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SimResult<()> {
        self.solver_type.validate()?;

        if !self.negativity_tolerance.is_finite() || self.negativity_tolerance < 0.0 {
            return Err(SimulationError::configuration(format!(
                "negativity tolerance must be finite and non-negative, got {}",
                self.negativity_tolerance
            )));
        }

        Ok(())
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method integrating a [`Scenario`] over a configured grid
///
/// Implementations are stateless: the same solver value can be reused for any
/// number of runs and shared between threads.
pub trait Solver: Send + Sync {
    /// Integrate the scenario and sample the state at every grid point
    ///
    /// # Errors
    ///
    /// - configuration family not supported by this solver
    /// - invalid configuration or scenario
    /// - numerical failure (non-finite or negative state, step control)
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> SimResult<SimulationResult>;

    /// Display name of the method
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Work done by a solver during one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Calls to `compute_derivatives`
    pub function_evaluations: usize,

    /// Steps kept
    pub accepted_steps: usize,

    /// Steps discarded by error control (always 0 for fixed-step methods)
    pub rejected_steps: usize,
}

/// Trajectory produced by a solver
///
/// Row `k` of `trajectory` holds the state at `time_points[k]`, columns follow
/// `compartments`. The matrix is allocated once, at its final size.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Output times (copy of the grid)
    pub time_points: Vec<f64>,

    /// Column layout of `trajectory`
    pub compartments: Arc<[Compartment]>,

    /// `time_points.len() × compartments.len()` samples
    pub trajectory: Array2<f64>,

    /// State at the last grid point
    pub final_state: CompartmentState,

    /// Work counters
    pub statistics: SolverStatistics,

    /// Free-form run information (solver name, tolerances, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Assemble a result from its parts
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the matrix shape disagrees with the time points
    /// or with the final state layout.
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Array2<f64>,
        final_state: CompartmentState,
    ) -> SimResult<Self> {
        let (rows, columns) = trajectory.dim();

        if rows != time_points.len() {
            return Err(SimulationError::DimensionMismatch {
                expected: time_points.len(),
                actual: rows,
            });
        }
        if columns != final_state.len() {
            return Err(SimulationError::DimensionMismatch {
                expected: final_state.len(),
                actual: columns,
            });
        }

        Ok(Self {
            time_points,
            compartments: Arc::clone(final_state.layout()),
            trajectory,
            final_state,
            statistics: SolverStatistics::default(),
            metadata: HashMap::new(),
        })
    }

    /// Attach solver statistics
    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of time points
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Column of one compartment over time
    pub fn series(&self, compartment: Compartment) -> Option<ArrayView1<'_, f64>> {
        self.compartments
            .iter()
            .position(|c| *c == compartment)
            .map(|column| self.trajectory.column(column))
    }

    /// Full state at row `index`
    pub fn state_at(&self, index: usize) -> Option<CompartmentState> {
        if index >= self.trajectory.nrows() {
            return None;
        }
        let values = DVector::from_iterator(
            self.compartments.len(),
            self.trajectory.row(index).iter().copied(),
        );
        Some(self.final_state.with_values(values))
    }

    /// Sum over compartments at every time point
    pub fn totals(&self) -> Array1<f64> {
        self.trajectory.sum_axis(Axis(1))
    }

    /// First maximum of a compartment, with its grid time
    ///
    /// # Errors
    ///
    /// `MissingCompartment` if the compartment is not tracked,
    /// `EmptyTrajectory` if the result has no rows.
    pub fn peak(&self, compartment: Compartment) -> SimResult<PeakRecord> {
        let series = self
            .series(compartment)
            .ok_or_else(|| SimulationError::MissingCompartment(compartment.to_string()))?;

        let values = series.to_vec();
        let mut record = find_peak(&values).ok_or(SimulationError::EmptyTrajectory)?;
        record.time = self.time_points[record.index];

        Ok(record)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid() -> TimeGrid {
        TimeGrid::linspace(0.0, 10.0, 11).unwrap()
    }

    fn sample_result() -> SimulationResult {
        let trajectory = array![
            [990.0, 10.0, 0.0],
            [980.0, 15.0, 5.0],
            [960.0, 25.0, 15.0],
            [950.0, 25.0, 25.0],
            [948.0, 12.0, 40.0],
        ];
        let final_state = CompartmentState::new(
            &Compartment::SIR,
            DVector::from_vec(vec![948.0, 12.0, 40.0]),
        )
        .unwrap();

        SimulationResult::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], trajectory, final_state).unwrap()
    }

    #[test]
    fn test_solver_type_names() {
        assert_eq!(SolverType::FixedStep { substeps: 1 }.name(), "FixedStep");
        assert_eq!(
            SolverConfiguration::adaptive(grid()).solver_type.name(),
            "Adaptive"
        );
    }

    #[test]
    fn test_fixed_step_rejects_zero_substeps() {
        let config = SolverConfiguration::fixed_step(grid(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_adaptive_defaults() {
        let config = SolverConfiguration::adaptive(grid());

        assert_eq!(
            config.solver_type,
            SolverType::Adaptive {
                relative_tolerance: DEFAULT_TOLERANCE,
                absolute_tolerance: DEFAULT_TOLERANCE,
                max_steps: DEFAULT_MAX_STEPS,
            }
        );
        assert_eq!(config.negativity_tolerance, DEFAULT_NEGATIVITY_TOLERANCE);
    }

    #[test]
    fn test_adaptive_builders() {
        let config = SolverConfiguration::adaptive(grid())
            .with_tolerances(1e-6, 1e-9)
            .with_max_steps(42);

        match config.solver_type {
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => {
                assert_eq!(relative_tolerance, 1e-6);
                assert_eq!(absolute_tolerance, 1e-9);
                assert_eq!(max_steps, 42);
            }
            other => panic!("unexpected solver type {:?}", other),
        }
    }

    #[test]
    fn test_builders_ignore_fixed_step() {
        let config = SolverConfiguration::fixed_step(grid(), 5).with_tolerances(1e-3, 1e-3);
        assert_eq!(config.solver_type, SolverType::FixedStep { substeps: 5 });
    }

    #[test]
    fn test_adaptive_rejects_bad_tolerances() {
        assert!(SolverConfiguration::adaptive(grid())
            .with_tolerances(0.0, 1e-8)
            .validate()
            .is_err());
        assert!(SolverConfiguration::adaptive(grid())
            .with_tolerances(1e-8, f64::NAN)
            .validate()
            .is_err());
        assert!(SolverConfiguration::adaptive(grid())
            .with_max_steps(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_negativity_tolerance_validation() {
        let config = SolverConfiguration::adaptive(grid()).with_negativity_tolerance(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_result_shape_checked() {
        let final_state =
            CompartmentState::new(&Compartment::SIR, DVector::from_vec(vec![1.0, 0.0, 0.0]))
                .unwrap();

        let result = SimulationResult::new(vec![0.0, 1.0], Array2::zeros((3, 3)), final_state);
        assert!(matches!(
            result,
            Err(SimulationError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_series_and_state_at() {
        let result = sample_result();

        let infected = result.series(Compartment::Infected).unwrap();
        assert_eq!(infected.to_vec(), vec![10.0, 15.0, 25.0, 25.0, 12.0]);
        assert!(result.series(Compartment::Custom("Exposed")).is_none());

        let state = result.state_at(1).unwrap();
        assert_eq!(state.get(Compartment::Recovered), Some(5.0));
        assert!(result.state_at(5).is_none());
    }

    #[test]
    fn test_totals() {
        let result = sample_result();
        assert!(result.totals().iter().all(|&total| total == 1000.0));
    }

    #[test]
    fn test_peak_first_maximum() {
        let result = sample_result();
        let peak = result.peak(Compartment::Infected).unwrap();

        // 25.0 appears at rows 2 and 3: the earliest wins
        assert_eq!(peak.index, 2);
        assert_eq!(peak.time, 2.0);
        assert_eq!(peak.value, 25.0);
    }

    #[test]
    fn test_peak_missing_compartment() {
        let result = sample_result();
        let err = result.peak(Compartment::Custom("Vaccinated")).unwrap_err();
        assert!(matches!(err, SimulationError::MissingCompartment(_)));
    }

    #[test]
    fn test_metadata() {
        let mut result = sample_result();
        result.add_metadata("solver", "test");
        assert_eq!(result.metadata.get("solver").map(String::as_str), Some("test"));
        assert_eq!(result.len(), 5);
        assert!(!result.is_empty());
    }
}
