//! Convergence tests for numerical solvers
//!
//! These tests verify that solvers exhibit the expected
//! convergence rates when refining the time step, and that the adaptive
//! solver's error follows its tolerance.

use sir_rs::solver::{Dopri5Solver, EulerSolver, RK4Solver};
use sir_rs::solver::{Solver, SolverConfiguration, TimeGrid};

mod common;
use common::{ExponentialDecay, create_simple_scenario, relative_error};

/// Final value of dy/dt = -k·y over [0, T] with `substeps` steps
fn fixed_step_final(solver: &dyn Solver, decay_rate: f64, total_time: f64, substeps: usize) -> f64 {
    let scenario = create_simple_scenario(Box::new(ExponentialDecay::new(1.0, decay_rate)));
    let grid = TimeGrid::linspace(0.0, total_time, 2).unwrap();
    let config = SolverConfiguration::fixed_step(grid, substeps);

    solver.solve(&scenario, &config).unwrap().final_state.values()[0]
}

#[test]
fn test_euler_first_order_convergence() {
    // Euler should have first-order convergence: error ~ O(dt)
    // When dt → dt/2, error should → error/2

    let decay_rate: f64 = 0.3;
    let total_time: f64 = 10.0;
    let exact = (-decay_rate * total_time).exp();

    let euler = EulerSolver::new();
    let errors: Vec<f64> = [100, 200, 400, 800]
        .iter()
        .map(|&steps| (fixed_step_final(&euler, decay_rate, total_time, steps) - exact).abs())
        .collect();

    for (i, pair) in errors.windows(2).enumerate() {
        let ratio = pair[0] / pair[1];
        println!("Euler convergence ratio {}->{}: {}", i, i + 1, ratio);

        // Should be close to 2 for first-order
        assert!(
            ratio > 1.8 && ratio < 2.2,
            "Convergence ratio {} not first-order",
            ratio
        );
    }
}

#[test]
fn test_rk4_fourth_order_convergence() {
    // RK4 should have fourth-order convergence: error ~ O(dt⁴)
    // When dt → dt/2, error should → error/16

    let decay_rate: f64 = 1.0;
    let total_time: f64 = 2.0;
    let exact = (-decay_rate * total_time).exp();

    let rk4 = RK4Solver::new();
    let errors: Vec<f64> = [20, 40, 80, 160]
        .iter()
        .map(|&steps| (fixed_step_final(&rk4, decay_rate, total_time, steps) - exact).abs())
        .collect();

    for (i, pair) in errors.windows(2).enumerate() {
        let ratio = pair[0] / pair[1];
        println!("RK4 convergence ratio {}->{}: {}", i, i + 1, ratio);

        assert!(
            ratio > 12.0 && ratio < 20.0,
            "Convergence ratio {} not fourth-order",
            ratio
        );
    }
}

#[test]
fn test_dopri5_error_follows_tolerance() {
    // Tighter tolerance → smaller error and more steps

    let decay_rate: f64 = 0.7;
    let total_time: f64 = 10.0;
    let exact = (-decay_rate * total_time).exp();
    let grid = TimeGrid::linspace(0.0, total_time, 11).unwrap();

    let mut errors = Vec::new();
    let mut steps = Vec::new();

    for tolerance in [1e-4, 1e-6, 1e-8, 1e-10] {
        let scenario = create_simple_scenario(Box::new(ExponentialDecay::new(1.0, decay_rate)));
        let config = SolverConfiguration::adaptive(grid.clone()).with_tolerances(tolerance, tolerance);

        let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();
        let error = relative_error(result.final_state.values()[0], exact);

        // Global error stays within a modest multiple of the tolerance
        assert!(
            error < 100.0 * tolerance / exact,
            "error {} too large for tolerance {}",
            error,
            tolerance
        );

        errors.push(error);
        steps.push(result.statistics.accepted_steps);
    }

    assert!(errors[3] < errors[0]);
    assert!(steps[3] > steps[0]);
}

#[test]
fn test_rk4_beats_euler_at_equal_cost() {
    // 4 Euler steps cost as much as 1 RK4 step
    let decay_rate: f64 = 0.5;
    let total_time: f64 = 5.0;
    let exact = (-decay_rate * total_time).exp();

    let euler_error = relative_error(
        fixed_step_final(&EulerSolver::new(), decay_rate, total_time, 400),
        exact,
    );
    let rk4_error = relative_error(
        fixed_step_final(&RK4Solver::new(), decay_rate, total_time, 100),
        exact,
    );

    assert!(
        rk4_error < euler_error / 1000.0,
        "RK4 error {} not much better than Euler error {}",
        rk4_error,
        euler_error
    );
}
