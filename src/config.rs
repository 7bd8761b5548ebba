//! Run configuration
//!
//! A [`SimulationConfig`] describes a complete run (parameters, output grid,
//! numerical method) and can be loaded from YAML:
//!
//! ```yaml
//! model:
//!   population: 1000.0
//!   beta: 1.0
//!   gamma: 0.1
//!   initial_infected: 1.0
//! time_grid:
//!   start: 0.0
//!   end: 100.0
//!   points: 101
//! solver:
//!   method: rk4
//!   substeps: 10
//! ```
//!
//! Every section is optional; a missing section takes the reference-run
//! value. Inside a section, omitted keys take per-field defaults instead:
//! a `model` section needs `population`, `beta` and `gamma`, and
//! `initial_infected` defaults to a single index case (1), not the reference
//! run's 1000. Parsing is strict (unknown keys are errors) and is followed by the
//! same semantic validation the solvers apply.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SimResult, SimulationError};
use crate::models::{SirModel, SirParameters};
use crate::solver::{
    DEFAULT_MAX_STEPS, DEFAULT_NEGATIVITY_TOLERANCE, DEFAULT_TOLERANCE, Dopri5Solver,
    EulerSolver, RK4Solver, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
    TimeGrid,
};

// =================================================================================================
// Sections
// =================================================================================================

/// Evenly spaced output grid, endpoints included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeGridConfig {
    /// First output time
    #[serde(default)]
    pub start: f64,

    /// Last output time
    pub end: f64,

    /// Number of output points
    pub points: usize,
}

impl Default for TimeGridConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 365.0,
            points: 365,
        }
    }
}

impl TimeGridConfig {
    /// Build the grid
    ///
    /// # Errors
    ///
    /// See [`TimeGrid::linspace`].
    pub fn build(&self) -> SimResult<TimeGrid> {
        TimeGrid::linspace(self.start, self.end, self.points)
    }
}

/// Numerical method and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase", deny_unknown_fields)]
pub enum SolverChoice {
    /// Adaptive Dormand-Prince 5(4)
    Dopri5 {
        #[serde(default = "default_tolerance")]
        relative_tolerance: f64,
        #[serde(default = "default_tolerance")]
        absolute_tolerance: f64,
        #[serde(default = "default_max_steps")]
        max_steps: usize,
    },

    /// Classical Runge-Kutta, fixed steps
    Rk4 {
        #[serde(default = "default_substeps")]
        substeps: usize,
    },

    /// Forward Euler, fixed steps
    Euler {
        #[serde(default = "default_substeps")]
        substeps: usize,
    },
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

fn default_substeps() -> usize {
    10
}

fn default_negativity_tolerance() -> f64 {
    DEFAULT_NEGATIVITY_TOLERANCE
}

impl Default for SolverChoice {
    fn default() -> Self {
        Self::Dopri5 {
            relative_tolerance: DEFAULT_TOLERANCE,
            absolute_tolerance: DEFAULT_TOLERANCE,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl SolverChoice {
    /// The matching solver
    pub fn solver(&self) -> Box<dyn Solver> {
        match self {
            Self::Dopri5 { .. } => Box::new(Dopri5Solver::new()),
            Self::Rk4 { .. } => Box::new(RK4Solver::new()),
            Self::Euler { .. } => Box::new(EulerSolver::new()),
        }
    }

    /// The matching configuration family
    pub fn solver_type(&self) -> SolverType {
        match *self {
            Self::Dopri5 {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            },
            Self::Rk4 { substeps } | Self::Euler { substeps } => {
                SolverType::FixedStep { substeps }
            }
        }
    }
}

// =================================================================================================
// Top-level configuration
// =================================================================================================

/// Complete description of a run
///
/// `Default` is the reference run: 45.74 M people, 1000 initial infections,
/// β = 0.3, γ = 1/14, 365 points over [0, 365] days, Dormand-Prince.
///
/// # Example
///
/// ```rust
/// use sir_rs::config::SimulationConfig;
///
/// let config = SimulationConfig::from_yaml(
///     "model: { population: 1000.0, beta: 0.0, gamma: 0.1, initial_infected: 10.0 }\n\
///      time_grid: { end: 100.0, points: 101 }\n",
/// ).unwrap();
///
/// let summary = config.summarize().unwrap();
/// assert_eq!(summary.peak.index, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Model parameters
    #[serde(default)]
    pub model: SirParameters,

    /// Output grid
    #[serde(default)]
    pub time_grid: TimeGridConfig,

    /// Numerical method
    #[serde(default)]
    pub solver: SolverChoice,

    /// Allowed negative overshoot, relative to the population
    #[serde(default = "default_negativity_tolerance")]
    pub negativity_tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            model: SirParameters::default(),
            time_grid: TimeGridConfig::default(),
            solver: SolverChoice::default(),
            negativity_tolerance: DEFAULT_NEGATIVITY_TOLERANCE,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        debug!("loading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// An empty document yields the reference run.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        if yaml.trim().is_empty() {
            warn!("empty configuration, using the reference run");
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;

        Ok(config)
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// The first parameter, grid or solver error found.
    pub fn validate(&self) -> SimResult<()> {
        self.model.validate()?;
        self.time_grid.build()?;
        self.solver_configuration()?.validate()?;

        if self.time_grid.points < 2 {
            warn!("time grid has a single point, nothing will be integrated");
        }

        Ok(())
    }

    /// Model + initial state
    pub fn build_scenario(&self) -> Scenario {
        Scenario::new(Box::new(SirModel::new(self.model)))
    }

    /// Grid + method parameters
    ///
    /// # Errors
    ///
    /// Invalid time grid.
    pub fn solver_configuration(&self) -> SimResult<SolverConfiguration> {
        let grid = self.time_grid.build()?;
        Ok(SolverConfiguration::new(grid, self.solver.solver_type())
            .with_negativity_tolerance(self.negativity_tolerance))
    }

    /// The configured method
    pub fn build_solver(&self) -> Box<dyn Solver> {
        self.solver.solver()
    }

    /// Integrate the configured run
    ///
    /// # Errors
    ///
    /// Any validation or numerical error.
    pub fn run(&self) -> SimResult<SimulationResult> {
        let scenario = self.build_scenario();
        let configuration = self.solver_configuration()?;
        self.build_solver().solve(&scenario, &configuration)
    }

    /// Integrate and summarize the configured run
    ///
    /// # Errors
    ///
    /// Any validation or numerical error.
    pub fn summarize(&self) -> SimResult<crate::analysis::EpidemicSummary> {
        crate::analysis::EpidemicSummary::from_result(&self.run()?)
    }
}

impl std::str::FromStr for SimulationConfig {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml(s)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
