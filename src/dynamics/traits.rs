//! Compartmental model traits and types
//!
//! This module defines the core API for compartmental models:
//! - `CompartmentalModel`: trait for all compartmental models
//! - `CompartmentState`: state vector tagged by its compartment layout
//! - `Compartment`: type-safe compartment identifiers

use nalgebra::DVector;
use std::fmt;
use std::sync::Arc;

use crate::error::{SimResult, SimulationError};

// =================================================================================================
// Compartments (Type-safe Identifiers)
// =================================================================================================

/// Known epidemic compartments (type-safe enum)
///
/// # Enum type safety
///
/// Models tracking compartments other than S, I and R (exposed, vaccinated, ...)
/// should use `Custom` rather than reusing one of the standard variants.
///
/// # Example
/// ```
/// use sir_rs::dynamics::Compartment;
///
/// let exposed = Compartment::Custom("Exposed");
/// assert_eq!(exposed.symbol(), "Exposed");
/// assert_eq!(Compartment::Infected.symbol(), "I");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    /// Individuals who can still catch the disease
    Susceptible,

    /// Individuals currently infectious
    Infected,

    /// Individuals who recovered (or were removed) and no longer transmit
    Recovered,

    /// Custom compartment (for use extension)
    Custom(&'static str),
}

impl Compartment {
    /// Standard SIR layout, in integration order
    pub const SIR: [Compartment; 3] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
    ];

    /// Short symbol used in tables and metadata
    pub fn symbol(&self) -> &'static str {
        match self {
            Compartment::Susceptible => "S",
            Compartment::Infected => "I",
            Compartment::Recovered => "R",
            Compartment::Custom(name) => name,
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compartment::Susceptible => write!(f, "Susceptible"),
            Compartment::Infected => write!(f, "Infected"),
            Compartment::Recovered => write!(f, "Recovered"),
            Compartment::Custom(name) => write!(f, "{}", name),
        }
    }
}

// =================================================================================================
// Compartment State (Tagged State Vector)
// =================================================================================================

/// State of a compartmental system at a given time
///
/// Values are stored in a single `DVector` so the solvers can do plain vector
/// arithmetic; the layout maps each position to its [`Compartment`]. The
/// layout is shared (`Arc`) between all states produced from the same model,
/// so cloning a state only copies the numbers.
///
/// # Example
/// ```
/// use sir_rs::dynamics::{Compartment, CompartmentState};
/// use nalgebra::DVector;
///
/// let state = CompartmentState::new(
///     &Compartment::SIR,
///     DVector::from_vec(vec![990.0, 10.0, 0.0]),
/// ).unwrap();
///
/// assert_eq!(state.get(Compartment::Infected), Some(10.0));
/// assert_eq!(state.total(), 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompartmentState {
    /// Compartment stored at each position of `values`
    layout: Arc<[Compartment]>,

    /// Compartment sizes
    values: DVector<f64>,
}

impl CompartmentState {
    /// Create a state from a layout and matching values
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when `values` and `compartments` differ in length.
    pub fn new(compartments: &[Compartment], values: DVector<f64>) -> SimResult<Self> {
        Self::with_layout(Arc::from(compartments), values)
    }

    /// Create a state reusing an existing shared layout
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` when `values` and `layout` differ in length.
    pub fn with_layout(layout: Arc<[Compartment]>, values: DVector<f64>) -> SimResult<Self> {
        if layout.len() != values.len() {
            return Err(SimulationError::DimensionMismatch {
                expected: layout.len(),
                actual: values.len(),
            });
        }
        Ok(Self { layout, values })
    }

    /// All compartments empty
    pub fn zeros(layout: Arc<[Compartment]>) -> Self {
        let values = DVector::zeros(layout.len());
        Self { layout, values }
    }

    /// Same layout, all compartments empty
    pub fn zeros_like(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
            values: DVector::zeros(self.values.len()),
        }
    }

    /// Same layout, new values
    ///
    /// Used by solvers to turn an intermediate stage vector back into a state.
    /// `values` must have the layout's length.
    pub fn with_values(&self, values: DVector<f64>) -> Self {
        debug_assert_eq!(values.len(), self.layout.len());
        Self {
            layout: Arc::clone(&self.layout),
            values,
        }
    }

    /// Size of a compartment
    pub fn get(&self, compartment: Compartment) -> Option<f64> {
        self.index_of(compartment).map(|i| self.values[i])
    }

    /// Position of a compartment in the layout
    pub fn index_of(&self, compartment: Compartment) -> Option<usize> {
        self.layout.iter().position(|c| *c == compartment)
    }

    /// Compartment layout
    pub fn compartments(&self) -> &[Compartment] {
        &self.layout
    }

    /// Shared handle on the layout
    pub fn layout(&self) -> &Arc<[Compartment]> {
        &self.layout
    }

    /// Raw values, in layout order
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Mutable access to the raw values
    pub fn values_mut(&mut self) -> &mut DVector<f64> {
        &mut self.values
    }

    /// Consume the state, keeping only the values
    pub fn into_values(self) -> DVector<f64> {
        self.values
    }

    /// Number of compartments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum over all compartments (the population for a closed model)
    pub fn total(&self) -> f64 {
        self.values.sum()
    }

    /// Iterate over `(compartment, value)` pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (Compartment, f64)> + '_ {
        self.layout.iter().copied().zip(self.values.iter().copied())
    }
}

impl fmt::Display for CompartmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(c, v)| format!("{}={:.3}", c.symbol(), v))
            .collect();
        write!(f, "({})", parts.join(", "))
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for CompartmentState {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.layout, rhs.layout);
        self.values += rhs.values;
        self
    }
}

impl std::ops::Mul<f64> for CompartmentState {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self::Output {
        self.values *= scalar;
        self
    }
}

// =================================================================================================
// Compartmental Model Trait
// =================================================================================================

/// Trait for compartmental models
///
/// # Responsibility
/// Computes the right-hand side f(t, y) of dy/dt = f(t, y) for a given state.
/// Does NOT integrate it (that's the Solver's job).
///
/// The model provides the "dynamics" (equations), the Solver provides
/// the "numerics" (method to integrate them).
pub trait CompartmentalModel: Send + Sync {
    /// Compartments tracked by the model, in integration order
    fn compartments(&self) -> &[Compartment];

    /// Computes the time derivative at a given state
    ///
    /// # Arguments
    /// * `t` - Current simulation time
    /// * `state` - Current compartment sizes
    ///
    /// # Returns
    /// A state with the same layout whose values are dy/dt
    fn compute_derivatives(&self, t: f64, state: &CompartmentState) -> CompartmentState;

    /// Creates the initial state for this model
    fn setup_initial_state(&self) -> CompartmentState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }

    /// Check that the model parameters are within the model's valid domain
    fn validate(&self) -> SimResult<()> {
        Ok(())
    }

    /// Check model-specific constraints on a starting state
    ///
    /// Called on the scenario's initial state after the layout checks, so the
    /// state is known to have this model's compartments.
    fn validate_initial_state(&self, _state: &CompartmentState) -> SimResult<()> {
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
