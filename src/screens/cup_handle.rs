//! Cup-and-handle screen: two chained peak-trough-peak searches over the
//! HMA(3) of closes, a narrow handle first and then a wider cup whose
//! search range starts at the handle's left boundary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::{hull_ma, rolling_mean, slope};
use crate::matcher::PeakTroughPeak;
use crate::screens::{Outcome, Screen, SkipReason};
use crate::series::{recent, turnover};
use crate::thresholds::TurnoverThresholds;
use crate::{DailyOhlcv, PeakRatio, Tolerance};

/// Series length floor. The cup search range reaches back 100 bars and the
/// 60-bar trend average needs warmup on top of that.
pub const MIN_LEN: usize = 110;

const SMOOTHING_PERIOD: usize = 3;
const TREND_SLOPE_POINTS: usize = 3;

/// Handle search range, in relative indices.
const HANDLE_BEGIN: usize = 2;
const HANDLE_END: usize = 15;
/// Cup search end; its begin is the handle match's left boundary.
const CUP_END: usize = 100;

const HANDLE_SHAPE: PeakTroughPeak = PeakTroughPeak {
    peak_allowance: Tolerance::new_const(0.01),
    peak_trough_ratio: PeakRatio::new_const(1.05),
};
const CUP_SHAPE: PeakTroughPeak = PeakTroughPeak {
    peak_allowance: Tolerance::new_const(0.01),
    peak_trough_ratio: PeakRatio::new_const(1.3),
};

// ============================================================
// SCREEN
// ============================================================

/// Cup-and-handle shape screen with liquidity and trend prefilters.
#[derive(Debug, Clone)]
pub struct CupHandleScreen {
    /// Suffix-keyed liquidity floors; gate 2 requires turnover strictly
    /// above the symbol's threshold.
    pub thresholds: TurnoverThresholds,
    pub handle: PeakTroughPeak,
    pub cup: PeakTroughPeak,
}

impl Default for CupHandleScreen {
    fn default() -> Self {
        Self {
            thresholds: TurnoverThresholds::default(),
            handle: HANDLE_SHAPE,
            cup: CUP_SHAPE,
        }
    }
}

impl CupHandleScreen {
    pub fn new(thresholds: TurnoverThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }
}

/// One matched stock. Rim dates name the two peaks of the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CupHandleRow {
    pub symbol: String,
    /// Handle's left peak (the rim nearer the present).
    pub inner_rim: NaiveDate,
    /// Cup's left peak (the rim further in the past).
    pub outer_rim: NaiveDate,
    /// Bars between the two rims.
    pub width: usize,
}

impl Screen for CupHandleScreen {
    type Row = CupHandleRow;

    fn name(&self) -> &'static str {
        "cup_handle"
    }

    fn min_len(&self) -> usize {
        MIN_LEN
    }

    fn evaluate<T: DailyOhlcv>(&self, symbol: &str, bars: &[T]) -> Outcome<CupHandleRow> {
        if bars.len() < MIN_LEN {
            return Outcome::Skip(SkipReason::TooShort {
                len: bars.len(),
                need: MIN_LEN,
            });
        }

        let threshold = self.thresholds.for_symbol(symbol);
        let recent_turnover = turnover(bars, 2);
        if recent_turnover <= threshold {
            return Outcome::Skip(SkipReason::LowTurnover {
                turnover: recent_turnover,
                threshold,
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();

        let ma60 = rolling_mean(&closes, 60);
        let ma60_slope = slope(&ma60, TREND_SLOPE_POINTS);
        if ma60_slope < 0.0 {
            return Outcome::Skip(SkipReason::FallingTrend {
                indicator: "MA60",
                slope: ma60_slope,
            });
        }

        let smoothed = hull_ma(&closes, SMOOTHING_PERIOD);
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date()).collect();

        let Some(handle) = self.handle.find(&smoothed, HANDLE_BEGIN, HANDLE_END) else {
            return Outcome::Skip(SkipReason::NoHandle);
        };
        let inner_rim = *recent(&dates, handle.left_index)
            .expect("handle left peak lies within the series");

        // Stage 2 starts where stage 1 ended.
        let Some(cup) = self.cup.find(&smoothed, handle.left_index, CUP_END) else {
            return Outcome::Skip(SkipReason::HandleWithoutCup { inner_rim });
        };
        let outer_rim =
            *recent(&dates, cup.left_index).expect("cup left peak lies within the series");

        Outcome::Match(CupHandleRow {
            symbol: symbol.to_string(),
            inner_rim,
            outer_rim,
            width: cup.left_index - handle.left_index,
        })
    }
}

// ============================================================
// TESTS
// ============================================================
