//! Compartmental dynamics
//!
//! This module provides the traits and types shared by every compartmental
//! model. A model encapsulates the equations of an epidemic (SIR, SEIR, ...),
//! nothing else.
//!
//! # Core Concepts
//!
//! - **Compartmental Model**: Computes dy/dt at a given state and time
//! - **Compartment State**: Compartment sizes tagged by their layout
//! - **Compartment**: Type-safe identifier for a compartment
//!
//! # Architecture
//!
//! Models are **separate from numerical solvers**:
//! - The model provides the **equations** (dynamics)
//! - The solver provides the **method** to integrate them (numerics)
//!
//! This separation allows:
//! - Same model with different solvers (Dormand-Prince, RK4, Euler)
//! - Same solver with different models (SIR, test models with known solutions)
//!
//! # Implementing a New Model
//!
//! ```rust
//! use sir_rs::dynamics::{Compartment, CompartmentalModel, CompartmentState};
//! use nalgebra::DVector;
//!
//! /// dI/dt = -gamma * I (recovery without transmission)
//! struct PureRecovery {
//!     gamma: f64,
//! }
//!
//! const LAYOUT: [Compartment; 2] = [Compartment::Infected, Compartment::Recovered];
//!
//! impl CompartmentalModel for PureRecovery {
//!     fn compartments(&self) -> &[Compartment] {
//!         &LAYOUT
//!     }
//!
//!     fn compute_derivatives(&self, _t: f64, state: &CompartmentState) -> CompartmentState {
//!         let i = state.values()[0];
//!         state.with_values(DVector::from_vec(vec![-self.gamma * i, self.gamma * i]))
//!     }
//!
//!     fn setup_initial_state(&self) -> CompartmentState {
//!         CompartmentState::new(&LAYOUT, DVector::from_vec(vec![100.0, 0.0]))
//!             .expect("layout and values have the same length")
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Pure Recovery"
//!     }
//! }
//!
//! let model = PureRecovery { gamma: 0.1 };
//! let initial = model.setup_initial_state();
//! let rate = model.compute_derivatives(0.0, &initial);
//! assert_eq!(rate.get(Compartment::Recovered), Some(10.0));
//! ```

pub mod traits;

// re-export commonly used types for convenience
pub use traits::{Compartment, CompartmentState, CompartmentalModel};
