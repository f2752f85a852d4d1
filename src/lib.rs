//! # trendsieve
//!
//! Deterministic chart-pattern screens over daily OHLCV series.
//!
//! The crate answers yes/no/when questions about moving-average crossovers,
//! trend slopes, and geometric peak/trough configurations, and composes them
//! into two screening pipelines:
//!
//! - [`screens::GoldenCrossScreen`] — EMA(8/21) + Volume-EMA(8/21) + MACD(5,34,5)
//!   golden-cross screen with turnover and trend gates.
//! - [`screens::CupHandleScreen`] — a cup-then-handle screen built from two
//!   chained peak-trough-peak searches at different scales.
//!
//! All algorithms address a series **relative to its most recent observation**
//! (index 1 = latest, index 2 = second-latest, ...). That addressing scheme is
//! implemented once in [`series`] and used everywhere else.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use trendsieve::prelude::*;
//!
//! // Build a daily series (dates strictly increasing).
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bars: Vec<DailyBar> = (0..120)
//!     .map(|t| {
//!         let close = 100.0 + t as f64;
//!         DailyBar {
//!             date: start + chrono::Duration::days(t),
//!             open: close - 0.5,
//!             high: close + 1.0,
//!             low: close - 1.0,
//!             close,
//!             volume: 1_000_000.0,
//!         }
//!     })
//!     .collect();
//!
//! let screen = GoldenCrossScreen::default();
//! let universe: Vec<(&str, &[DailyBar])> = vec![("ACME", &bars)];
//! let summary = run_screen(&screen, universe);
//! assert_eq!(summary.rows.len() + summary.skipped.len(), 1);
//! ```

pub mod crossover;
pub mod indicators;
pub mod matcher;
pub mod screens;
pub mod series;
pub mod thresholds;

pub mod prelude {
    pub use crate::{
        // Crossover detection
        crossover::{crosses_above, crosses_within},
        // Trend indicators
        indicators::{ema, hull_ma, is_increasing, rolling_mean, slope},
        // Peak-trough-peak matcher
        matcher::{PeakTroughPeak, PtpMatch},
        // Screens and batch runners
        screens::{
            run_screen, run_screen_parallel, CupHandleRow, CupHandleScreen, GoldenCrossConfig,
            GoldenCrossRow, GoldenCrossScreen, Outcome, Screen, ScreenFailure, ScreenSummary,
            SkipReason, Skipped,
        },
        // Series utilities
        series::{recent, turnover, validate_series, Indicator},
        // Threshold table
        thresholds::{suffix_of, TurnoverThresholds},
        // Core types
        DailyBar,
        DailyOhlcv,
        PeakRatio,
        Result,
        ScreenError,
        Tolerance,
    };
}

use chrono::NaiveDate;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors that can occur while configuring or feeding a screen.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScreenError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Symmetric tolerance band half-width in range 0.0..=1.0.
///
/// A peak allowance of 0.01 accepts a right peak within ±1% of the left peak.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Create a new Tolerance, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(ScreenError::InvalidValue(
                "Tolerance cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ScreenError::OutOfRange {
                field: "Tolerance",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Tolerance from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Tolerance {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Tolerance {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Tolerance::new(value).map_err(serde::de::Error::custom)
    }
}

/// Minimum peak-to-trough ratio (must be finite and >= 1.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PeakRatio(f64);

impl PeakRatio {
    /// Create a new PeakRatio, validating the value is finite and >= 1.0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(ScreenError::InvalidValue(
                "PeakRatio cannot be NaN or infinite",
            ));
        }
        if value < 1.0 {
            return Err(ScreenError::InvalidValue("PeakRatio must be >= 1.0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for PeakRatio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for PeakRatio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        PeakRatio::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// DAILY OHLCV
// ============================================================

/// A single dated daily observation.
///
/// Screens are generic over this trait so callers can feed their own bar
/// types without converting.
pub trait DailyOhlcv {
    fn date(&self) -> NaiveDate;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

/// Blanket impl for references to dyn DailyOhlcv
impl DailyOhlcv for &dyn DailyOhlcv {
    fn date(&self) -> NaiveDate {
        (*self).date()
    }

    fn open(&self) -> f64 {
        (*self).open()
    }

    fn high(&self) -> f64 {
        (*self).high()
    }

    fn low(&self) -> f64 {
        (*self).low()
    }

    fn close(&self) -> f64 {
        (*self).close()
    }

    fn volume(&self) -> f64 {
        (*self).volume()
    }
}

/// Owned daily bar, convenient for loading snapshots.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyOhlcv for DailyBar {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

// ============================================================
// TESTS
// ============================================================
