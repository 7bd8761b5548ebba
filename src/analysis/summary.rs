//! Outcome of an SIR run

use std::fmt;

use crate::analysis::PeakRecord;
use crate::dynamics::Compartment;
use crate::error::{SimResult, SimulationError};
use crate::solver::SimulationResult;

/// Headline numbers of an epidemic
///
/// # Example
///
/// ```rust
/// use sir_rs::analysis::EpidemicSummary;
/// use sir_rs::models::{SirModel, SirParameters};
/// use sir_rs::solver::{Dopri5Solver, Scenario, Solver, SolverConfiguration, TimeGrid};
///
/// let scenario = Scenario::new(Box::new(SirModel::new(SirParameters::new(
///     1000.0, 1.0, 0.1, 1.0,
/// ))));
/// let grid = TimeGrid::linspace(0.0, 100.0, 101).unwrap();
/// let result = Dopri5Solver::new()
///     .solve(&scenario, &SolverConfiguration::adaptive(grid))
///     .unwrap();
///
/// let summary = EpidemicSummary::from_result(&result).unwrap();
/// assert!(summary.attack_rate > 0.99);
/// assert!(summary.peak.index > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpidemicSummary {
    /// First maximum of the infected curve
    pub peak: PeakRecord,

    /// Population (sum of compartments at the first grid point)
    pub population: f64,

    /// Susceptible at the last grid point
    pub final_susceptible: f64,

    /// Infected at the last grid point
    pub final_infected: f64,

    /// Recovered at the last grid point
    pub final_recovered: f64,

    /// Share of the population infected at some point: (N - S_final) / N
    pub attack_rate: f64,
}

impl EpidemicSummary {
    /// Summarize an SIR trajectory
    ///
    /// # Errors
    ///
    /// `MissingCompartment` if S, I or R is not tracked, `EmptyTrajectory`
    /// for a result without rows.
    pub fn from_result(result: &SimulationResult) -> SimResult<Self> {
        if result.is_empty() {
            return Err(SimulationError::EmptyTrajectory);
        }

        let peak = result.peak(Compartment::Infected)?;

        let last = |compartment: Compartment| {
            result
                .final_state
                .get(compartment)
                .ok_or_else(|| SimulationError::MissingCompartment(compartment.to_string()))
        };

        let final_susceptible = last(Compartment::Susceptible)?;
        let final_infected = last(Compartment::Infected)?;
        let final_recovered = last(Compartment::Recovered)?;

        let population = result.trajectory.row(0).sum();
        let attack_rate = if population > 0.0 {
            (population - final_susceptible) / population
        } else {
            0.0
        };

        Ok(Self {
            peak,
            population,
            final_susceptible,
            final_infected,
            final_recovered,
            attack_rate,
        })
    }

    /// Peak prevalence as a share of the population
    pub fn peak_fraction(&self) -> f64 {
        if self.population > 0.0 {
            self.peak.value / self.population
        } else {
            0.0
        }
    }

    /// The one-line peak report
    pub fn peak_announcement(&self) -> String {
        self.peak.announcement()
    }
}

impl fmt::Display for EpidemicSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.peak_announcement())?;
        writeln!(
            f,
            "Peak prevalence: {:.1}% of {:.0}",
            100.0 * self.peak_fraction(),
            self.population
        )?;
        writeln!(
            f,
            "Final sizes: S={:.0}, I={:.0}, R={:.0}",
            self.final_susceptible, self.final_infected, self.final_recovered
        )?;
        write!(f, "Attack rate: {:.1}%", 100.0 * self.attack_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::CompartmentState;
    use nalgebra::DVector;
    use ndarray::array;

    fn result(trajectory: ndarray::Array2<f64>, layout: &[Compartment]) -> SimulationResult {
        let last = trajectory.row(trajectory.nrows() - 1).to_vec();
        let final_state = CompartmentState::new(layout, DVector::from_vec(last)).unwrap();
        let times = (0..trajectory.nrows()).map(|k| k as f64 * 0.5).collect();
        SimulationResult::new(times, trajectory, final_state).unwrap()
    }

    #[test]
    fn test_summary_values() {
        let trajectory = array![
            [990.0, 10.0, 0.0],
            [900.0, 80.0, 20.0],
            [700.0, 150.0, 150.0],
            [600.0, 40.0, 360.0],
        ];
        let summary = EpidemicSummary::from_result(&result(trajectory, &Compartment::SIR)).unwrap();

        assert_eq!(summary.peak.index, 2);
        assert_eq!(summary.peak.time, 1.0);
        assert_eq!(summary.population, 1000.0);
        assert_eq!(summary.final_susceptible, 600.0);
        assert_eq!(summary.final_recovered, 360.0);
        assert!((summary.attack_rate - 0.4).abs() < 1e-12);
        assert!((summary.peak_fraction() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_summary_requires_sir_layout() {
        let trajectory = array![[1.0, 0.0], [0.5, 0.5]];
        let layout = [Compartment::Infected, Compartment::Recovered];

        let err = EpidemicSummary::from_result(&result(trajectory, &layout)).unwrap_err();
        assert!(matches!(err, SimulationError::MissingCompartment(_)));
    }

    #[test]
    fn test_display_contains_announcement() {
        let trajectory = array![[990.0, 10.0, 0.0], [985.0, 9.0, 6.0]];
        let summary = EpidemicSummary::from_result(&result(trajectory, &Compartment::SIR)).unwrap();

        let text = summary.to_string();
        assert!(text.starts_with("Peak infection occurs on day 0 with 0.0 million infected."));
        assert!(text.contains("Attack rate: 1.5%"));
    }
}
