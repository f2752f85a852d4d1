//! Peak-trough-peak matcher: a nested geometric scan for a three-point
//! shape (right peak, left peak, trough between them) in a smoothed series.
//!
//! The cup-and-handle screen runs this twice at different scales, feeding
//! the handle match's left boundary into the cup search as its `begin`.

use crate::series::Indicator;
use crate::{PeakRatio, Result, Tolerance};

/// A detected three-point shape, in most-recent-relative indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PtpMatch {
    /// Left boundary of the shape — the candidate left peak. Chained
    /// searches start from here.
    pub left_index: usize,
    /// The qualifying trough between the two peaks.
    pub trough_index: usize,
}

/// Peak-trough-peak search parameters.
///
/// `peak_allowance` is the symmetric band the right peak must fall into
/// around the left peak; `peak_trough_ratio` is the minimum left-peak to
/// trough ratio.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PeakTroughPeak {
    pub peak_allowance: Tolerance,
    pub peak_trough_ratio: PeakRatio,
}

impl PeakTroughPeak {
    pub fn new(peak_allowance: f64, peak_trough_ratio: f64) -> Result<Self> {
        Ok(Self {
            peak_allowance: Tolerance::new(peak_allowance)?,
            peak_trough_ratio: PeakRatio::new(peak_trough_ratio)?,
        })
    }

    /// Scan relative index range `[begin, end)` for the shape, with the right
    /// peak fixed at `series[begin]`.
    ///
    /// Two explicit loops, first match wins:
    /// - outer: `left` ascending from `begin + 3` (the smallest left-peak
    ///   span first);
    /// - inner: `trough` descending from `left - 1` down to `begin + 4`
    ///   (the trough closest to the left peak first).
    ///
    /// The scan order is the tie-break rule and is behaviorally significant.
    /// Returns `None` when `end <= begin`, when the range runs past the
    /// series start, or when no pair qualifies. `NaN` values (unwarmed
    /// smoother positions) never qualify.
    pub fn find(&self, series: &Indicator, begin: usize, end: usize) -> Option<PtpMatch> {
        if end <= begin {
            return None;
        }
        let right_peak = series.get(begin)?;
        let allowance = self.peak_allowance.get();
        let min_ratio = self.peak_trough_ratio.get();

        for left in begin + 3..end {
            let Some(left_peak) = series.get(left) else {
                // The scan walked past the start of the series.
                break;
            };
            let lo = (1.0 - allowance) * left_peak;
            let hi = (1.0 + allowance) * left_peak;
            for trough in (begin + 4..left).rev() {
                let Some(trough_val) = series.get(trough) else {
                    continue;
                };
                if lo <= right_peak && right_peak <= hi && left_peak / trough_val >= min_ratio {
                    return Some(PtpMatch {
                        left_index: left,
                        trough_index: trough,
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(allowance: f64, ratio: f64) -> PeakTroughPeak {
        PeakTroughPeak::new(allowance, ratio).unwrap()
    }

    /// Build an indicator from values listed most-recent-first
    /// (`rel[0]` becomes relative index 1).
    fn from_recent(rel: &[f64]) -> Indicator {
        let mut v: Vec<f64> = rel.to_vec();
        v.reverse();
        Indicator::new(v)
    }

    #[test]
    fn test_empty_range_not_found() {
        let series = from_recent(&[100.0; 40]);
        let m = matcher(0.01, 1.05);
        assert!(m.find(&series, 5, 5).is_none());
        assert!(m.find(&series, 7, 3).is_none());
    }

    #[test]
    fn test_range_past_series_start_not_found() {
        let series = from_recent(&[100.0; 6]);
        let m = matcher(0.01, 1.05);
        // end far past the data; flat series has no shape anyway, but the
        // scan must stop cleanly instead of panicking
        assert!(m.find(&series, 2, 50).is_none());
    }

    #[test]
    fn test_basic_match() {
        // rel idx:            1      2      3     4     5     6      7
        let series = from_recent(&[100.0, 100.0, 96.0, 94.0, 94.0, 94.0, 100.0]);
        let m = matcher(0.01, 1.05);
        let hit = m.find(&series, 2, 10).unwrap();
        // left = 7 is the only index holding ~100; the nearest qualifying
        // trough below it is 6 (100/94 > 1.05)
        assert_eq!(hit.left_index, 7);
        assert_eq!(hit.trough_index, 6);
    }

    #[test]
    fn test_outer_tie_break_smallest_left_wins() {
        // Valid left peaks at rel 7 and 9 (both 100, troughs available for
        // each); the outer scan ascends, so 7 wins.
        let series = from_recent(&[
            100.0, 100.0, 96.0, 94.0, 94.0, 94.0, 100.0, 94.0, 100.0, 90.0,
        ]);
        let m = matcher(0.01, 1.05);
        let hit = m.find(&series, 2, 12).unwrap();
        assert_eq!(hit.left_index, 7);
    }

    #[test]
    fn test_inner_tie_break_nearest_trough_wins() {
        // Two qualifying troughs for left = 8 at rel 6 and 7; the inner scan
        // descends from left - 1, so 7 (nearest the left peak) wins.
        let series = from_recent(&[
            100.0, 100.0, 96.0, 96.0, 96.0, 94.0, 93.0, 100.0, 100.0,
        ]);
        let m = matcher(0.01, 1.05);
        let hit = m.find(&series, 2, 12).unwrap();
        assert_eq!(hit.left_index, 8);
        assert_eq!(hit.trough_index, 7);
    }

    #[test]
    fn test_peak_band_is_inclusive() {
        // right peak exactly on the lower band edge: (1 - 0.01) * 100 = 99
        let series = from_recent(&[99.0, 99.0, 96.0, 96.0, 94.0, 94.0, 100.0]);
        let m = matcher(0.01, 1.05);
        assert!(m.find(&series, 2, 10).is_some());

        // just outside the band: no match
        let series = from_recent(&[98.9, 98.9, 96.0, 96.0, 94.0, 94.0, 100.0]);
        assert!(m.find(&series, 2, 10).is_none());
    }

    #[test]
    fn test_trough_ratio_gate() {
        // trough too shallow for ratio 1.3
        let series = from_recent(&[100.0, 100.0, 96.0, 94.0, 94.0, 94.0, 100.0]);
        let m = matcher(0.01, 1.3);
        assert!(m.find(&series, 2, 10).is_none());

        // deep enough trough qualifies
        let series = from_recent(&[100.0, 100.0, 96.0, 75.0, 75.0, 75.0, 100.0]);
        assert!(m.find(&series, 2, 10).is_some());
    }

    #[test]
    fn test_trough_exclusive_lower_bound() {
        // The inner scan stops above begin + 3: a deep value sitting exactly
        // at rel 5 (= begin + 3) must not be used as a trough.
        //                             1      2      3      4     5      6
        let series = from_recent(&[100.0, 100.0, 100.0, 100.0, 70.0, 100.0]);
        let m = matcher(0.01, 1.05);
        assert!(m.find(&series, 2, 7).is_none());
    }

    #[test]
    fn test_nan_positions_never_match() {
        let series = from_recent(&[
            100.0,
            100.0,
            96.0,
            f64::NAN,
            f64::NAN,
            f64::NAN,
            100.0,
        ]);
        let m = matcher(0.01, 1.05);
        assert!(m.find(&series, 2, 10).is_none());
    }
}
