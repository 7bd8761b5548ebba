//! Peak extraction

use std::fmt;

/// Location and height of the maximum of a series
///
/// `index` is the grid row; for the reference grid it is read as the day
/// number. `time` is the grid time of that row once attached to a result
/// (see [`SimulationResult::peak`](crate::solver::SimulationResult::peak)),
/// and equals `index` for a bare series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRecord {
    /// Row of the maximum
    pub index: usize,

    /// Time of the maximum
    pub time: f64,

    /// Value of the maximum
    pub value: f64,
}

impl PeakRecord {
    /// One-line report of an infection peak, with the value in millions
    ///
    /// ```rust
    /// use sir_rs::analysis::PeakRecord;
    ///
    /// let peak = PeakRecord { index: 57, time: 57.16, value: 19_236_401.0 };
    /// assert_eq!(
    ///     peak.announcement(),
    ///     "Peak infection occurs on day 57 with 19.2 million infected."
    /// );
    /// ```
    pub fn announcement(&self) -> String {
        format!(
            "Peak infection occurs on day {} with {:.1} million infected.",
            self.index,
            self.value / 1e6
        )
    }
}

impl fmt::Display for PeakRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peak {} at t = {} (row {})", self.value, self.time, self.index)
    }
}

/// First maximum of a series
///
/// Single pass with a strict comparison, so the earliest index wins ties.
/// NaN entries never become the maximum. Returns `None` for an empty series
/// or one without any non-NaN value.
///
/// ```rust
/// use sir_rs::analysis::find_peak;
///
/// let peak = find_peak(&[1.0, 4.0, 2.0, 4.0]).unwrap();
/// assert_eq!(peak.index, 1);
/// assert_eq!(peak.value, 4.0);
///
/// assert!(find_peak(&[]).is_none());
/// assert!(find_peak(&[f64::NAN]).is_none());
/// ```
pub fn find_peak(series: &[f64]) -> Option<PeakRecord> {
    let (index, value) = series
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, value)| !value.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (index, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((index, value)),
        })?;

    Some(PeakRecord {
        index,
        time: index as f64,
        value,
    })
}
