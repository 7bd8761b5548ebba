//! Mock compartmental models for testing
//!
//! These models have known analytical solutions, making them
//! ideal for validating numerical solver accuracy.

use nalgebra::DVector;
use sir_rs::dynamics::{Compartment, CompartmentState, CompartmentalModel};

const SINGLE: [Compartment; 1] = [Compartment::Custom("y")];

const CHAIN: [Compartment; 2] = [Compartment::Custom("A"), Compartment::Custom("B")];

// =================================================================================================
// Exponential Decay: dy/dt = -k*y
// =================================================================================================

/// Exponential decay model: dy/dt = -k*y
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub initial: f64,
    pub decay_rate: f64, // k in dy/dt = -k*y
}

impl ExponentialDecay {
    pub fn new(initial: f64, decay_rate: f64) -> Self {
        Self {
            initial,
            decay_rate,
        }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64) -> f64 {
        self.initial * (-self.decay_rate * t).exp()
    }
}

impl CompartmentalModel for ExponentialDecay {
    fn compartments(&self) -> &[Compartment] {
        &SINGLE
    }

    fn compute_derivatives(&self, _t: f64, state: &CompartmentState) -> CompartmentState {
        state.with_values(state.values() * -self.decay_rate)
    }

    fn setup_initial_state(&self) -> CompartmentState {
        CompartmentState::new(&SINGLE, DVector::from_element(1, self.initial))
            .expect("single compartment")
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}

// =================================================================================================
// Constant Growth: dy/dt = c
// =================================================================================================

/// Constant growth model: dy/dt = c
///
/// Analytical solution: y(t) = c*t
///
/// Euler is exact for this problem, RK4 should also be exact.
pub struct ConstantGrowth {
    pub growth_rate: f64,
}

impl ConstantGrowth {
    pub fn new(growth_rate: f64) -> Self {
        Self { growth_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64) -> f64 {
        self.growth_rate * t
    }
}

impl CompartmentalModel for ConstantGrowth {
    fn compartments(&self) -> &[Compartment] {
        &SINGLE
    }

    fn compute_derivatives(&self, _t: f64, state: &CompartmentState) -> CompartmentState {
        state.with_values(DVector::from_element(1, self.growth_rate))
    }

    fn setup_initial_state(&self) -> CompartmentState {
        CompartmentState::new(&SINGLE, DVector::zeros(1)).expect("single compartment")
    }

    fn name(&self) -> &str {
        "Constant Growth"
    }
}

// =================================================================================================
// Decay Chain: A → B → ∅
// =================================================================================================

/// Two-stage decay chain: dA/dt = -k·A, dB/dt = k·A - m·B
///
/// Analytical solution (k ≠ m, B(0) = 0):
///
/// ```text
/// A(t) = A₀·exp(-k·t)
/// B(t) = A₀·k/(m - k)·(exp(-k·t) - exp(-m·t))
/// ```
///
/// B rises then falls, so its peak is interior: t* = ln(m/k)/(m - k).
pub struct DecayChain {
    pub initial: f64,
    pub k: f64,
    pub m: f64,
}

impl DecayChain {
    pub fn new(initial: f64, k: f64, m: f64) -> Self {
        Self { initial, k, m }
    }

    /// (A(t), B(t))
    pub fn analytical_solution(&self, t: f64) -> (f64, f64) {
        let a = self.initial * (-self.k * t).exp();
        let b = self.initial * self.k / (self.m - self.k)
            * ((-self.k * t).exp() - (-self.m * t).exp());
        (a, b)
    }

    /// Time of the maximum of B
    pub fn peak_time(&self) -> f64 {
        (self.m / self.k).ln() / (self.m - self.k)
    }
}

impl CompartmentalModel for DecayChain {
    fn compartments(&self) -> &[Compartment] {
        &CHAIN
    }

    fn compute_derivatives(&self, _t: f64, state: &CompartmentState) -> CompartmentState {
        let y = state.values();
        state.with_values(DVector::from_vec(vec![
            -self.k * y[0],
            self.k * y[0] - self.m * y[1],
        ]))
    }

    fn setup_initial_state(&self) -> CompartmentState {
        CompartmentState::new(&CHAIN, DVector::from_vec(vec![self.initial, 0.0]))
            .expect("two compartments")
    }

    fn name(&self) -> &str {
        "Decay Chain"
    }
}

// =================================================================================================
// Tests for Mock Models
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_decay_analytical() {
        let model = ExponentialDecay::new(1.0, 0.5);

        assert!((model.analytical_solution(0.0) - 1.0).abs() < 1e-10);
        assert!((model.analytical_solution(1.0) - 0.6065306597).abs() < 1e-6);
    }

    #[test]
    fn test_constant_growth_analytical() {
        let model = ConstantGrowth::new(2.0);
        assert!((model.analytical_solution(5.0) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_decay_chain_analytical() {
        let model = DecayChain::new(1.0, 0.5, 1.5);
        let (a, b) = model.analytical_solution(0.0);
        assert_eq!((a, b), (1.0, 0.0));
        assert!(model.peak_time() > 0.0);
    }
}
