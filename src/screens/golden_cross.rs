//! EMA(8/21) golden-cross screen with volume and MACD confirmation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::crossover::crosses_within;
use crate::indicators::{ema, slope};
use crate::screens::{Outcome, Screen, SkipReason};
use crate::series::turnover;
use crate::DailyOhlcv;

/// Series length floor. EMA60 plus a 3-point slope needs this much history
/// before the output stops being seed-dominated.
pub const MIN_LEN: usize = 80;

/// Default minimum turnover at the second-to-last bar.
pub const DEFAULT_MIN_TURNOVER: f64 = 2.0e7;

const TREND_SLOPE_POINTS: usize = 3;

// ============================================================
// CONFIGURATION
// ============================================================

/// Tunable parameters for [`GoldenCrossScreen`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GoldenCrossConfig {
    /// Crossover lookback: relative indices `1..=1 + search_period` are
    /// probed, in all three crossover searches alike. Zero probes only
    /// the latest bar pair.
    pub search_period: usize,
    /// Liquidity floor applied to turnover at relative index 2.
    pub min_turnover: f64,
}

impl Default for GoldenCrossConfig {
    fn default() -> Self {
        Self {
            search_period: 0,
            min_turnover: DEFAULT_MIN_TURNOVER,
        }
    }
}

// ============================================================
// SCREEN
// ============================================================

/// Six-gate momentum screen: liquidity, EMA60 trend, an EMA(8/21) price
/// cross (or a still-rising EMA21), a volume EMA(8/21) cross, and a
/// MACD(5,34,5) signal-line confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoldenCrossScreen {
    pub config: GoldenCrossConfig,
}

impl GoldenCrossScreen {
    pub fn new(config: GoldenCrossConfig) -> Self {
        Self { config }
    }
}

/// One matched stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenCrossRow {
    pub symbol: String,
    pub last_date: NaiveDate,
    /// Latest EMA60 value, rounded to 2 decimals.
    pub ema60: f64,
    /// Date of the EMA(8/21) cross, when one was found in the window.
    /// Absent when the stock passed on EMA21 slope alone.
    pub golden_cross: Option<NaiveDate>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Screen for GoldenCrossScreen {
    type Row = GoldenCrossRow;

    fn name(&self) -> &'static str {
        "golden_cross"
    }

    fn min_len(&self) -> usize {
        MIN_LEN
    }

    fn evaluate<T: DailyOhlcv>(&self, symbol: &str, bars: &[T]) -> Outcome<GoldenCrossRow> {
        if bars.len() < MIN_LEN {
            return Outcome::Skip(SkipReason::TooShort {
                len: bars.len(),
                need: MIN_LEN,
            });
        }

        let recent_turnover = turnover(bars, 2);
        if recent_turnover < self.config.min_turnover {
            return Outcome::Skip(SkipReason::LowTurnover {
                turnover: recent_turnover,
                threshold: self.config.min_turnover,
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume()).collect();
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date()).collect();
        let period = self.config.search_period;

        let ema60 = ema(&closes, 60);
        let ema60_slope = slope(&ema60, TREND_SLOPE_POINTS);
        if ema60_slope < 0.0 {
            return Outcome::Skip(SkipReason::FallingTrend {
                indicator: "EMA60",
                slope: ema60_slope,
            });
        }

        // Gate 4: a price cross is not strictly required as long as the
        // faster trend line is still rising.
        let ema8 = ema(&closes, 8);
        let ema21 = ema(&closes, 21);
        let golden_cross = crosses_within(&ema8, &ema21, &dates, 1, period);
        if golden_cross.is_none() && slope(&ema21, TREND_SLOPE_POINTS) < 0.0 {
            return Outcome::Skip(SkipReason::NoGoldenCross);
        }

        let vol8 = ema(&volumes, 8);
        let vol21 = ema(&volumes, 21);
        if crosses_within(&vol8, &vol21, &dates, 1, period).is_none() {
            return Outcome::Skip(SkipReason::NoVolumeCross);
        }

        // Gate 6: MACD(5,34,5) cross plus price and signal confirmations.
        let macd = ema(&closes, 5).sub(&ema(&closes, 34));
        let signal = ema(macd.values(), 5);
        let macd_confirmed = crosses_within(&macd, &signal, &dates, 1, period).is_some()
            && closes[closes.len() - 1] > ema60.at(1)
            && signal.at(1) > signal.at(2)
            && signal.at(1) >= 0.0;
        if !macd_confirmed {
            return Outcome::Skip(SkipReason::NoMacdConfirmation);
        }

        Outcome::Match(GoldenCrossRow {
            symbol: symbol.to_string(),
            last_date: dates[dates.len() - 1],
            ema60: round2(ema60.at(1)),
            golden_cross,
        })
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DailyBar;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64, volume: f64) -> DailyBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Days::new(u64::from(day));
        DailyBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn flat_series(len: usize) -> Vec<DailyBar> {
        (0..len).map(|t| bar(t as u32, 100.0, 1.0e6)).collect()
    }

    #[test]
    fn short_series_skips_whole() {
        let screen = GoldenCrossScreen::default();
        let bars = flat_series(79);
        let outcome = screen.evaluate("TEST", &bars);
        assert_eq!(
            outcome,
            Outcome::Skip(SkipReason::TooShort { len: 79, need: 80 })
        );
    }

    #[test]
    fn low_turnover_skips() {
        let screen = GoldenCrossScreen::default();
        // 100 * 1e4 = 1e6, below the 2e7 default floor.
        let bars: Vec<DailyBar> = (0..90).map(|t| bar(t, 100.0, 1.0e4)).collect();
        match screen.evaluate("TEST", &bars) {
            Outcome::Skip(SkipReason::LowTurnover { threshold, .. }) => {
                assert_eq!(threshold, DEFAULT_MIN_TURNOVER);
            }
            other => panic!("expected low-turnover skip, got {other:?}"),
        }
    }

    #[test]
    fn flat_series_has_no_volume_cross() {
        // Constant close and volume: every EMA pair is equal everywhere,
        // and ties never count as a cross.
        let screen = GoldenCrossScreen::new(GoldenCrossConfig {
            search_period: 10,
            min_turnover: 1.0,
        });
        let bars = flat_series(120);
        let outcome = screen.evaluate("FLAT", &bars);
        assert_eq!(outcome, Outcome::Skip(SkipReason::NoVolumeCross));
    }

    #[test]
    fn falling_trend_skips_before_cross_search() {
        let screen = GoldenCrossScreen::new(GoldenCrossConfig {
            search_period: 10,
            min_turnover: 1.0,
        });
        // Steady decline keeps the EMA60 slope negative.
        let bars: Vec<DailyBar> = (0..120)
            .map(|t| bar(t, 200.0 - f64::from(t), 1.0e6))
            .collect();
        match screen.evaluate("DOWN", &bars) {
            Outcome::Skip(SkipReason::FallingTrend { indicator, slope }) => {
                assert_eq!(indicator, "EMA60");
                assert!(slope < 0.0);
            }
            other => panic!("expected falling-trend skip, got {other:?}"),
        }
    }

    #[test]
    fn round2_behaves_like_row_formatting() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.125), 0.13);
    }
}
