//! Example: Reference epidemic with every solver
//!
//! Runs the reference SIR outbreak with the adaptive Dormand-Prince method,
//! RK4 and forward Euler, then compares the infection peak each one finds
//! with the closed-form peak of the model.
//!
//! **Parameters**:
//! - N  = 45.74 million (population)
//! - β  = 0.3 per day (contact rate)
//! - γ  = 1/14 per day (recovery rate)
//! - I₀ = 1000, R₀ = 0
//! - Grid: 365 points over [0, 365] days

use sir_rs::{
    analysis::EpidemicSummary,
    models::{SirModel, SirParameters},
    solver::{
        Dopri5Solver, EulerSolver, RK4Solver, Scenario, SimulationResult, Solver,
        SolverConfiguration, TimeGrid,
    },
};

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("═══════════════════════════════════════════════════════");
    println!("  SIR Reference Epidemic - Solver Comparison");
    println!("═══════════════════════════════════════════════════════\n");

    let parameters = SirParameters::default();

    println!("Parameters:");
    println!("  N  (population) : {:.0}", parameters.population);
    println!("  β  (beta)       : {} /day", parameters.beta);
    println!("  γ  (gamma)      : {:.5} /day", parameters.gamma);
    println!("  R₀              : {:.2}", parameters.basic_reproduction_number());
    println!("  I₀              : {:.0}\n", parameters.initial_infected);

    let scenario = Scenario::new(Box::new(SirModel::new(parameters)));
    let grid = TimeGrid::reference();
    let substeps = 10;

    let runs: Vec<(Box<dyn Solver>, SolverConfiguration)> = vec![
        (
            Box::new(Dopri5Solver::new()),
            SolverConfiguration::adaptive(grid.clone()),
        ),
        (
            Box::new(RK4Solver::new()),
            SolverConfiguration::fixed_step(grid.clone(), substeps),
        ),
        (
            Box::new(EulerSolver::new()),
            SolverConfiguration::fixed_step(grid, substeps),
        ),
    ];

    let mut results: Vec<(&'static str, SimulationResult, f64)> = Vec::new();

    for (solver, config) in &runs {
        print!("  {:<22}", solver.name());

        let started = Instant::now();
        let result = solver.solve(&scenario, config)?;
        let elapsed = started.elapsed().as_secs_f64() * 1e3;

        println!("✓ {:.3} ms", elapsed);
        results.push((solver.name(), result, elapsed));
    }

    println!("\n═══════════════════════════════════════════════════════");
    println!("  Results: Infection Peak");
    println!("═══════════════════════════════════════════════════════\n");

    println!(
        "{:<22} {:>6} {:>14} {:>12} {:>10}",
        "Solver", "Day", "Infected", "Evaluations", "Time [ms]"
    );

    for (name, result, elapsed) in &results {
        let summary = EpidemicSummary::from_result(result)?;
        println!(
            "{:<22} {:>6} {:>14.0} {:>12} {:>10.3}",
            name,
            summary.peak.index,
            summary.peak.value,
            result.statistics.function_evaluations,
            elapsed
        );
    }

    let exact = parameters.theoretical_peak_infected();
    println!("\nClosed-form peak height: {:.0}", exact);

    if let Some((_, reference, _)) = results.first() {
        let summary = EpidemicSummary::from_result(reference)?;
        println!("\n{}", summary);
    }

    Ok(())
}
