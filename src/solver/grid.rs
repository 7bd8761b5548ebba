//! Output time grid
//!
//! The grid lists the times at which the solver must report the state. It is
//! independent of the internal step size: adaptive solvers choose their own
//! steps between grid points, fixed-step solvers split every grid interval
//! into a configured number of substeps.

use crate::error::{SimResult, SimulationError};
use std::fmt;

/// Ordered output times
///
/// # Invariants
///
/// - at least one point
/// - every point finite and non-negative
/// - strictly increasing
///
/// # Examples
///
/// ```rust
/// use sir_rs::solver::TimeGrid;
///
/// // Endpoint-inclusive, like numpy.linspace
/// let grid = TimeGrid::linspace(0.0, 10.0, 11).unwrap();
/// assert_eq!(grid.len(), 11);
/// assert_eq!(grid.end(), 10.0);
/// assert!((grid.as_slice()[3] - 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// `n` evenly spaced points from `start` to `end`, both included
    ///
    /// Point `k` is computed as `start + k·step` (never by accumulation) and
    /// the last point is set to `end` exactly.
    ///
    /// # Errors
    ///
    /// - `n == 0`
    /// - `n > 1` and `end <= start`
    /// - bounds not finite or negative
    pub fn linspace(start: f64, end: f64, n: usize) -> SimResult<Self> {
        if n == 0 {
            return Err(SimulationError::grid("a time grid needs at least one point"));
        }
        if n == 1 {
            return Self::from_points(vec![start]);
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(SimulationError::grid(format!(
                "end ({}) must be finite and greater than start ({})",
                end, start
            )));
        }

        let step = (end - start) / (n - 1) as f64;
        let mut points: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
        points[n - 1] = end;

        Self::from_points(points)
    }

    /// Reference grid: 365 points over [0, 365] days
    ///
    /// Note the spacing is 365/364 day, not exactly one day, since both ends
    /// are included.
    pub fn reference() -> Self {
        // 365 strictly increasing finite points: cannot fail
        let step = 365.0 / 364.0;
        let mut points: Vec<f64> = (0..365).map(|k| k as f64 * step).collect();
        points[364] = 365.0;
        Self { points }
    }

    /// Build a grid from explicit points
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeGrid` if the points are empty, not finite,
    /// negative or not strictly increasing.
    pub fn from_points(points: Vec<f64>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimulationError::grid("a time grid needs at least one point"));
        }

        if let Some(bad) = points.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(SimulationError::grid(format!(
                "time points must be finite and non-negative, found {}",
                bad
            )));
        }

        if let Some(k) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SimulationError::grid(format!(
                "time points must be strictly increasing: t[{}] = {} then t[{}] = {}",
                k,
                points[k],
                k + 1,
                points[k + 1]
            )));
        }

        Ok(Self { points })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated grid
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point (initial time)
    pub fn start(&self) -> f64 {
        self.points[0]
    }

    /// Last point (horizon)
    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Points as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    /// Consecutive `(from, to)` pairs
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Smallest gap between consecutive points (`None` for a single point)
    pub fn min_spacing(&self) -> Option<f64> {
        self.intervals().map(|(a, b)| b - a).reduce(f64::min)
    }
}

impl fmt::Display for TimeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points over [{}, {}]", self.len(), self.start(), self.end())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
