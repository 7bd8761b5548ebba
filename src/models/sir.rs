//! SIR model with mass-action transmission
//!
//! # Equations
//!
//! ```text
//! dS/dt = -β·S·I/N
//! dI/dt =  β·S·I/N - γ·I
//! dR/dt =  γ·I
//! ```
//!
//! The infection term assumes homogeneous mixing: the force of infection is
//! proportional to the infected fraction I/N. Recovery is first order with
//! rate γ, so the mean infectious period is 1/γ. The three derivatives sum to
//! zero, hence S + I + R = N along every exact trajectory.
//!
//! # First integral
//!
//! Dividing dI/dt by dS/dt gives dI/dS = -1 + N/(R₀·S), so
//!
//! ```text
//! V(S, I) = S + I - (N/R₀)·ln S
//! ```
//!
//! is constant in time. It yields the closed-form peak prevalence used by
//! [`SirParameters::theoretical_peak_infected`].

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::dynamics::{Compartment, CompartmentState, CompartmentalModel};
use crate::error::{SimResult, SimulationError};

/// Relative slack allowed between an initial state's total and N
const POPULATION_MISMATCH: f64 = 1e-9;

// =================================================================================================
// Parameters
// =================================================================================================

/// Parameters of an SIR run
///
/// Immutable once the run starts. `Default` is the reference scenario:
/// the 2020 population estimate of Uganda seeded with 1000 infections,
/// β = 0.3 per day and a 14-day infectious period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SirParameters {
    /// Total population N
    pub population: f64,

    /// Infection rate β (1/time)
    pub beta: f64,

    /// Recovery rate γ (1/time)
    pub gamma: f64,

    /// Initial number of infected individuals I₀
    ///
    /// Defaults to one index case when omitted from a configuration file.
    #[serde(default = "default_initial_infected")]
    pub initial_infected: f64,

    /// Initial number of recovered individuals R₀ (not the reproduction number)
    #[serde(default)]
    pub initial_recovered: f64,
}

fn default_initial_infected() -> f64 {
    1.0
}

impl Default for SirParameters {
    fn default() -> Self {
        Self {
            population: 45.74e6,
            beta: 0.3,
            gamma: 1.0 / 14.0,
            initial_infected: 1000.0,
            initial_recovered: 0.0,
        }
    }
}

impl SirParameters {
    /// Create parameters with no initial recoveries
    pub fn new(population: f64, beta: f64, gamma: f64, initial_infected: f64) -> Self {
        Self {
            population,
            beta,
            gamma,
            initial_infected,
            initial_recovered: 0.0,
        }
    }

    /// Builder pattern: set the initial number of recovered individuals
    pub fn with_initial_recovered(mut self, initial_recovered: f64) -> Self {
        self.initial_recovered = initial_recovered;
        self
    }

    /// S₀ = N - I₀ - R₀
    pub fn initial_susceptible(&self) -> f64 {
        self.population - self.initial_infected - self.initial_recovered
    }

    /// Basic reproduction number R₀ = β/γ
    ///
    /// Infinite when γ = 0 and β > 0; NaN when both rates are zero.
    pub fn basic_reproduction_number(&self) -> f64 {
        self.beta / self.gamma
    }

    /// Mean infectious period 1/γ
    pub fn infectious_period(&self) -> f64 {
        1.0 / self.gamma
    }

    /// Fraction that must be immune to stop growth: 1 - 1/R₀ (zero when R₀ ≤ 1)
    pub fn herd_immunity_threshold(&self) -> f64 {
        let r0 = self.basic_reproduction_number();
        if r0 > 1.0 { 1.0 - 1.0 / r0 } else { 0.0 }
    }

    /// Whether the infected compartment grows at t = 0 (effective R > 1)
    pub fn causes_outbreak(&self) -> bool {
        self.initial_infected > 0.0
            && self.beta * self.initial_susceptible() / self.population > self.gamma
    }

    /// Closed-form maximum of I(t) over t ≥ 0
    ///
    /// From the first integral: I_max = I₀ + S₀ - (N/R₀)·(1 + ln(R₀·S₀/N))
    /// when the epidemic grows initially, otherwise the maximum is I₀ itself.
    /// Only meaningful for γ > 0.
    pub fn theoretical_peak_infected(&self) -> f64 {
        if !self.causes_outbreak() {
            return self.initial_infected;
        }

        let n = self.population;
        let s0 = self.initial_susceptible();
        let r0 = self.basic_reproduction_number();

        self.initial_infected + s0 - (n / r0) * (1.0 + (r0 * s0 / n).ln())
    }

    /// Validate that parameters are within the model's domain
    ///
    /// # Errors
    ///
    /// - `population` not finite or not strictly positive (the model divides by N)
    /// - `beta` or `gamma` not finite or negative
    /// - initial counts not finite, negative, or exceeding the population
    pub fn validate(&self) -> SimResult<()> {
        if !self.population.is_finite() || self.population <= 0.0 {
            return Err(SimulationError::parameter(
                "population",
                format!("must be finite and strictly positive, got {}", self.population),
            ));
        }

        for (name, value) in [("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::parameter(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }

        for (name, value) in [
            ("initial_infected", self.initial_infected),
            ("initial_recovered", self.initial_recovered),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::parameter(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }

        if self.initial_infected + self.initial_recovered > self.population {
            return Err(SimulationError::parameter(
                "initial_infected",
                format!(
                    "initial infected ({}) plus recovered ({}) exceed the population ({})",
                    self.initial_infected, self.initial_recovered, self.population
                ),
            ));
        }

        Ok(())
    }
}

// =================================================================================================
// Model
// =================================================================================================

/// Mass-action SIR model
///
/// # Example
///
/// ```rust
/// use sir_rs::dynamics::{Compartment, CompartmentalModel};
/// use sir_rs::models::{SirModel, SirParameters};
///
/// let model = SirModel::new(SirParameters::new(1000.0, 1.0, 0.1, 1.0));
/// let initial = model.setup_initial_state();
///
/// assert_eq!(initial.get(Compartment::Susceptible), Some(999.0));
///
/// let rates = model.compute_derivatives(0.0, &initial);
/// // Nothing is created or destroyed
/// assert!(rates.total().abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SirModel {
    parameters: SirParameters,
    layout: Arc<[Compartment]>,
}

impl SirModel {
    /// Create a model from its parameters
    pub fn new(parameters: SirParameters) -> Self {
        Self {
            parameters,
            layout: Arc::from(&Compartment::SIR[..]),
        }
    }

    /// Model parameters
    pub fn parameters(&self) -> &SirParameters {
        &self.parameters
    }

    /// Evaluate the first integral V(S, I) = S + I - (N/R₀)·ln S
    ///
    /// Constant along exact trajectories; drift in a numerical trajectory
    /// measures the integration error. Requires β > 0 and S > 0.
    pub fn first_integral(&self, susceptible: f64, infected: f64) -> f64 {
        let p = &self.parameters;
        susceptible + infected - p.population * p.gamma / p.beta * susceptible.ln()
    }
}

impl Default for SirModel {
    fn default() -> Self {
        Self::new(SirParameters::default())
    }
}

impl CompartmentalModel for SirModel {
    fn compartments(&self) -> &[Compartment] {
        &self.layout
    }

    fn compute_derivatives(&self, _t: f64, state: &CompartmentState) -> CompartmentState {
        let y = state.values();
        let (s, i) = (y[0], y[1]);
        let p = &self.parameters;

        let infection = p.beta * s * i / p.population;
        let recovery = p.gamma * i;

        state.with_values(DVector::from_vec(vec![
            -infection,
            infection - recovery,
            recovery,
        ]))
    }

    fn setup_initial_state(&self) -> CompartmentState {
        let p = &self.parameters;
        let mut state = CompartmentState::zeros(Arc::clone(&self.layout));
        state.values_mut().copy_from_slice(&[
            p.initial_susceptible(),
            p.initial_infected,
            p.initial_recovered,
        ]);
        state
    }

    fn name(&self) -> &str {
        "SIR"
    }

    fn description(&self) -> Option<&str> {
        Some("Susceptible-Infected-Recovered with mass-action transmission")
    }

    fn validate(&self) -> SimResult<()> {
        self.parameters.validate()
    }

    /// The transmission term divides by N, so the state must sum to it
    fn validate_initial_state(&self, state: &CompartmentState) -> SimResult<()> {
        let population = self.parameters.population;
        let total = state.total();

        if (total - population).abs() > POPULATION_MISMATCH * population.max(1.0) {
            return Err(SimulationError::parameter(
                "initial state",
                format!(
                    "compartments sum to {} but the population is {}",
                    total, population
                ),
            ));
        }

        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_parameters() {
        let p = SirParameters::default();

        assert_eq!(p.population, 45_740_000.0);
        assert_eq!(p.initial_infected, 1000.0);
        assert_eq!(p.initial_susceptible(), 45_739_000.0);
        assert!((p.basic_reproduction_number() - 4.2).abs() < 1e-12);
        assert!((p.infectious_period() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_herd_immunity_threshold() {
        let p = SirParameters::new(1000.0, 0.4, 0.1, 1.0);
        assert!((p.herd_immunity_threshold() - 0.75).abs() < 1e-12);

        let subcritical = SirParameters::new(1000.0, 0.05, 0.1, 1.0);
        assert_eq!(subcritical.herd_immunity_threshold(), 0.0);
    }

    #[test]
    fn test_causes_outbreak() {
        assert!(SirParameters::new(1000.0, 1.0, 0.1, 1.0).causes_outbreak());
        assert!(!SirParameters::new(1000.0, 0.0, 0.1, 10.0).causes_outbreak());
        assert!(!SirParameters::new(1000.0, 1.0, 0.1, 0.0).causes_outbreak());
    }

    #[test]
    fn test_theoretical_peak_without_outbreak_is_initial() {
        let p = SirParameters::new(1000.0, 0.05, 0.1, 10.0);
        assert_eq!(p.theoretical_peak_infected(), 10.0);
    }

    #[test]
    fn test_theoretical_peak_reference() {
        // R0 = 4.2 and S0 ≈ N: i_max ≈ 1 - (1 + ln 4.2)/4.2 ≈ 0.42
        let p = SirParameters::default();
        let fraction = p.theoretical_peak_infected() / p.population;
        assert!(fraction > 0.41 && fraction < 0.43, "fraction {}", fraction);
    }

    #[test]
    fn test_validate_accepts_reference() {
        assert!(SirParameters::default().validate().is_ok());
        assert!(SirParameters::new(1000.0, 0.0, 0.1, 10.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_population() {
        let err = SirParameters::new(0.0, 0.3, 0.1, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("population"));

        let err = SirParameters::new(f64::NAN, 0.3, 0.1, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("population"));
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let err = SirParameters::new(1000.0, -0.3, 0.1, 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("beta"));

        let err = SirParameters::new(1000.0, 0.3, f64::INFINITY, 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("gamma"));
    }

    #[test]
    fn test_validate_rejects_oversized_initial_counts() {
        let p = SirParameters::new(1000.0, 0.3, 0.1, 800.0).with_initial_recovered(300.0);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("exceed the population"));

        let p = SirParameters::new(1000.0, 0.3, 0.1, -1.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_initial_state_layout() {
        let model = SirModel::new(SirParameters::new(1000.0, 1.0, 0.1, 10.0).with_initial_recovered(5.0));
        let state = model.setup_initial_state();

        assert_eq!(state.compartments(), &Compartment::SIR);
        assert_eq!(state.get(Compartment::Susceptible), Some(985.0));
        assert_eq!(state.get(Compartment::Infected), Some(10.0));
        assert_eq!(state.get(Compartment::Recovered), Some(5.0));
    }

    #[test]
    fn test_derivatives_values() {
        // S=900, I=100, N=1000, β=0.5, γ=0.2
        // infection = 0.5 * 900 * 100 / 1000 = 45, recovery = 20
        let model = SirModel::new(SirParameters::new(1000.0, 0.5, 0.2, 100.0));
        let state = model.setup_initial_state();

        let rates = model.compute_derivatives(0.0, &state);

        assert!((rates.get(Compartment::Susceptible).unwrap() + 45.0).abs() < 1e-12);
        assert!((rates.get(Compartment::Infected).unwrap() - 25.0).abs() < 1e-12);
        assert!((rates.get(Compartment::Recovered).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivatives_conserve_population() {
        let model = SirModel::default();
        let state = model.setup_initial_state();
        let rates = model.compute_derivatives(12.0, &state);

        assert!(rates.total().abs() < 1e-6);
    }

    #[test]
    fn test_no_infected_means_no_dynamics() {
        let model = SirModel::new(SirParameters::new(1000.0, 0.3, 0.1, 0.0));
        let rates = model.compute_derivatives(0.0, &model.setup_initial_state());

        assert!(rates.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_serde_yaml_roundtrip_defaults() {
        let yaml = "population: 1000.0\nbeta: 1.0\ngamma: 0.1\n";
        let p: SirParameters = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(p.initial_infected, 1.0);
        assert_eq!(p.initial_recovered, 0.0);
    }
}
