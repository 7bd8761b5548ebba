//! Simulation scenario definition
//!
//! A scenario combines a compartmental model with its initial state.

use crate::dynamics::{CompartmentState, CompartmentalModel};
use crate::error::{SimResult, SimulationError};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Compartmental model (equations and parameters)
/// - Initial state (value of every compartment at the first grid point)
///
/// # Design
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust
/// use sir_rs::models::{SirModel, SirParameters};
/// use sir_rs::solver::Scenario;
///
/// let scenario = Scenario::new(Box::new(SirModel::new(SirParameters::default())));
/// assert_eq!(scenario.get_model_name(), "SIR");
/// assert!(scenario.validate().is_ok());
/// ```
pub struct Scenario {
    /// Compartmental model (equations)
    pub model: Box<dyn CompartmentalModel>,

    /// State at the first grid point
    pub initial_state: CompartmentState,
}

impl Scenario {
    /// Create a scenario starting from the model's own initial state
    pub fn new(model: Box<dyn CompartmentalModel>) -> Self {
        let initial_state = model.setup_initial_state();
        Self {
            model,
            initial_state,
        }
    }

    /// Override the initial state
    pub fn with_initial_state(mut self, initial_state: CompartmentState) -> Self {
        self.initial_state = initial_state;
        self
    }

    /// Check the model parameters and that the initial state fits the model
    ///
    /// # Errors
    ///
    /// - parameter errors reported by the model
    /// - `DimensionMismatch` / `InvalidConfiguration` for a foreign layout
    /// - `InvalidParameter` for non-finite or negative initial values, or
    ///   for a state the model itself rejects (an SIR state must sum to N)
    pub fn validate(&self) -> SimResult<()> {
        self.model.validate()?;

        let expected = self.model.compartments();
        if expected.len() != self.initial_state.len() {
            return Err(SimulationError::DimensionMismatch {
                expected: expected.len(),
                actual: self.initial_state.len(),
            });
        }
        if expected != self.initial_state.compartments() {
            return Err(SimulationError::configuration(format!(
                "initial state layout {:?} does not match model layout {:?}",
                self.initial_state.compartments(),
                expected
            )));
        }

        for (compartment, value) in self.initial_state.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::parameter(
                    compartment.to_string(),
                    format!("initial value must be finite and non-negative, got {}", value),
                ));
            }
        }

        self.model.validate_initial_state(&self.initial_state)
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Number of integrated compartments
    pub fn ndim(&self) -> usize {
        self.initial_state.len()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("dimension", &self.ndim())
            .field("initial state", &self.initial_state.to_string())
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
