//! Epidemic models
//!
//! All models implement the [`CompartmentalModel`](crate::dynamics::CompartmentalModel)
//! trait. The solver calls `compute_derivatives` at every stage of every step;
//! models own the epidemiology, solvers own the time integration.
//!
//! # Available Models
//!
//! ## [`SirModel`]: Susceptible / Infected / Recovered
//!
//! Closed population, mass-action transmission with rate β, first-order
//! recovery with rate γ. Parameters live in [`SirParameters`], whose `Default`
//! is the reference run (N = 45.74 M, I₀ = 1000, β = 0.3, γ = 1/14).

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod sir;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use sir::{SirModel, SirParameters};
