//! Series utilities: most-recent-relative addressing, turnover, validation.
//!
//! Every algorithm in this crate addresses observations relative to the most
//! recent one: index 1 is the latest, index 2 the second-latest, and so on.
//! The addressing lives here, in [`recent`] and [`Indicator::at`], so the rest
//! of the crate never does reversed-index arithmetic by hand.

use crate::{DailyOhlcv, Result, ScreenError};

/// Most-recent-relative access into a chronological slice.
///
/// `i = 1` is the last element. Returns `None` for `i = 0` or `i > len`.
#[inline]
pub fn recent<T>(xs: &[T], i: usize) -> Option<&T> {
    if i == 0 {
        return None;
    }
    xs.len().checked_sub(i).map(|k| &xs[k])
}

/// Turnover (volume × close) at most-recent-relative index `i`.
///
/// Used as a liquidity proxy. Callers must have passed a length gate first;
/// an index beyond the series is a caller bug and panics.
#[inline]
pub fn turnover<T: DailyOhlcv>(bars: &[T], i: usize) -> f64 {
    let bar = recent(bars, i).expect("turnover: index beyond series length");
    bar.volume() * bar.close()
}

/// A derived numeric series, aligned 1:1 with the source it was computed from.
///
/// Immutable once built. Positions where a rolling window had insufficient
/// data hold `NaN`; comparisons against `NaN` are false, so such positions
/// never satisfy a crossing or pattern condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    values: Vec<f64>,
}

impl Indicator {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most-recent-relative access: `i = 1` is the latest value.
    ///
    /// Panics when `i == 0` or `i > len` — relative indices start at 1.
    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        *recent(&self.values, i).expect("Indicator::at: relative index out of range")
    }

    /// Non-panicking variant of [`Indicator::at`].
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        recent(&self.values, i).copied()
    }

    /// The latest value, `at(1)`.
    #[inline]
    pub fn last(&self) -> f64 {
        self.at(1)
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Pointwise difference, e.g. a MACD line from two EMAs.
    ///
    /// Panics when the two series are not aligned.
    pub fn sub(&self, rhs: &Indicator) -> Indicator {
        assert_eq!(
            self.len(),
            rhs.len(),
            "Indicator::sub: series must be aligned"
        );
        Indicator::new(
            self.values
                .iter()
                .zip(&rhs.values)
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

/// Validate one stock's series before screening.
///
/// Checks the Time Series invariants: strictly increasing dates (no
/// duplicates), finite numeric fields, `high >= low`, non-negative volume.
/// A failure here is isolated to the offending stock by the batch runners.
pub fn validate_series<T: DailyOhlcv>(bars: &[T]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
        let fields = [bar.open(), bar.high(), bar.low(), bar.close(), bar.volume()];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ScreenError::InvalidBar {
                index: i,
                reason: "non-finite field",
            });
        }
        if bar.high() < bar.low() {
            return Err(ScreenError::InvalidBar {
                index: i,
                reason: "high < low",
            });
        }
        if bar.volume() < 0.0 {
            return Err(ScreenError::InvalidBar {
                index: i,
                reason: "negative volume",
            });
        }
        if i > 0 && bars[i - 1].date() >= bar.date() {
            return Err(ScreenError::InvalidBar {
                index: i,
                reason: "dates not strictly increasing",
            });
        }
    }
    Ok(())
}
