//! Error types for sir-rs
//!
//! Every fallible operation in the crate returns [`SimResult<T>`]. The
//! variants are grouped by the layer that raises them: input validation
//! (parameters, grid, configuration), numerical integration (non-finite or
//! negative states, step control) and the outer configuration layer (I/O,
//! YAML).

use thiserror::Error;

/// Result type alias for sir-rs operations.
pub type SimResult<T> = Result<T, SimulationError>;

/// Unified error type for all sir-rs operations.
#[derive(Debug, Error)]
pub enum SimulationError {
    // ===== Input validation =====
    /// A model parameter is outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name (e.g. "population").
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The requested output time grid is unusable.
    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),

    /// The solver configuration is unusable.
    #[error("Invalid solver configuration: {0}")]
    InvalidConfiguration(String),

    /// A solver was handed a configuration family it does not implement.
    #[error("{solver} only supports {expected} configuration, got {requested}")]
    UnsupportedConfiguration {
        /// Solver display name.
        solver: &'static str,
        /// Configuration family the solver accepts.
        expected: &'static str,
        /// Configuration family that was supplied.
        requested: String,
    },

    /// A state vector does not match the compartment layout.
    #[error("Dimension mismatch: expected {expected} compartments, got {actual}")]
    DimensionMismatch {
        /// Number of compartments in the layout.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    // ===== Numerical integration =====
    /// NaN appeared in the integrated state.
    #[error(
        "NaN detected in {compartment} at t = {time} (step {step}). \
         This indicates numerical instability; tighten the tolerances or add substeps."
    )]
    NotANumber {
        /// Compartment holding the NaN.
        compartment: String,
        /// Simulation time of the offending step.
        time: f64,
        /// Index of the offending step.
        step: usize,
    },

    /// An infinite value appeared in the integrated state.
    #[error(
        "Infinity detected in {compartment} at t = {time} (step {step}). \
         This indicates numerical overflow; check the model parameters."
    )]
    Infinite {
        /// Compartment holding the infinity.
        compartment: String,
        /// Simulation time of the offending step.
        time: f64,
        /// Index of the offending step.
        step: usize,
    },

    /// A compartment went below zero by more than the configured tolerance.
    #[error(
        "Negative value {value:.6e} in {compartment} at t = {time} exceeds tolerance {tolerance:.6e}"
    )]
    NegativeCompartment {
        /// Compartment holding the negative value.
        compartment: String,
        /// The offending value.
        value: f64,
        /// Simulation time of the offending step.
        time: f64,
        /// Absolute tolerance that was exceeded.
        tolerance: f64,
    },

    /// The adaptive solver needed more internal steps than allowed.
    #[error("Step limit of {max_steps} exceeded while integrating from t = {from} to t = {to}")]
    StepLimitExceeded {
        /// Maximum number of internal steps per output interval.
        max_steps: usize,
        /// Start of the output interval.
        from: f64,
        /// End of the output interval.
        to: f64,
    },

    /// The adaptive step size collapsed below machine resolution.
    #[error("Step size underflow at t = {time} (h = {step_size:.3e})")]
    StepSizeUnderflow {
        /// Simulation time where the step collapsed.
        time: f64,
        /// The rejected step size.
        step_size: f64,
    },

    // ===== Analysis =====
    /// A result does not contain the requested compartment.
    #[error("Compartment {0} not present in simulation result")]
    MissingCompartment(String),

    /// A result contains no time points.
    #[error("Simulation result is empty")]
    EmptyTrajectory,

    // ===== Configuration layer =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl SimulationError {
    /// Create an invalid-parameter error.
    #[must_use]
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create an invalid-time-grid error.
    #[must_use]
    pub fn grid(message: impl Into<String>) -> Self {
        Self::InvalidTimeGrid(message.into())
    }

    /// Whether the error was raised while integrating (as opposed to
    /// validating inputs before the run started).
    #[must_use]
    pub const fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::NotANumber { .. }
                | Self::Infinite { .. }
                | Self::NegativeCompartment { .. }
                | Self::StepLimitExceeded { .. }
                | Self::StepSizeUnderflow { .. }
        )
    }
}
