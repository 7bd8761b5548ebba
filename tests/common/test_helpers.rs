//! Helper functions for integration tests

use sir_rs::config::SimulationConfig;
use sir_rs::dynamics::{CompartmentState, CompartmentalModel};
use sir_rs::models::{SirModel, SirParameters};
use sir_rs::solver::Scenario;

/// Assert that two states are close (within tolerance)
pub fn assert_states_close(
    state1: &CompartmentState,
    state2: &CompartmentState,
    tolerance: f64,
    message: &str,
) {
    assert_eq!(
        state1.compartments(),
        state2.compartments(),
        "{}: layout mismatch",
        message
    );

    for ((compartment, v1), (_, v2)) in state1.iter().zip(state2.iter()) {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: {} differs by {} (tolerance {})",
            message,
            compartment,
            diff,
            tolerance
        );
    }
}

/// Compute RMS error between two states
pub fn compute_l2_error(state1: &CompartmentState, state2: &CompartmentState) -> f64 {
    let diff = state1.values() - state2.values();
    if diff.is_empty() {
        0.0
    } else {
        (diff.norm_squared() / diff.len() as f64).sqrt()
    }
}

/// Create a scenario from the model's own initial state
pub fn create_simple_scenario(model: Box<dyn CompartmentalModel>) -> Scenario {
    Scenario::new(model)
}

/// SIR scenario from raw parameters
pub fn sir_scenario(population: f64, beta: f64, gamma: f64, initial_infected: f64) -> Scenario {
    Scenario::new(Box::new(SirModel::new(SirParameters::new(
        population,
        beta,
        gamma,
        initial_infected,
    ))))
}

/// Reference run configuration
pub fn reference_config() -> SimulationConfig {
    SimulationConfig::default()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_error() {
        assert!((relative_error(1.0, 1.0) - 0.0).abs() < 1e-10);
        assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-10);
        assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-10);
    }
}
