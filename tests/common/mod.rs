//! Common utilities for integration tests

#![allow(dead_code, unused_imports)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{ConstantGrowth, DecayChain, ExponentialDecay};
pub use test_helpers::{
    assert_states_close, compute_l2_error, create_simple_scenario, reference_config,
    relative_error, sir_scenario,
};
