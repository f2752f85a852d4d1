//! Screening pipelines and batch runners.
//!
//! A [`Screen`] evaluates one stock's series against a gate sequence and
//! either emits a result row or reports which gate failed. The runners
//! apply a screen to a whole universe, isolating per-stock failures and
//! logging skip reasons.

pub mod cup_handle;
pub mod golden_cross;

pub use cup_handle::{CupHandleRow, CupHandleScreen};
pub use golden_cross::{GoldenCrossConfig, GoldenCrossRow, GoldenCrossScreen};

use std::fmt;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::series::validate_series;
use crate::{DailyOhlcv, Result, ScreenError};

// ============================================================
// OUTCOME
// ============================================================

/// Which gate rejected a stock. Returned as data so skips are testable,
/// and logged by the runners for diagnosability.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum SkipReason {
    /// Below the screen's minimum-length floor; the stock is never
    /// partially evaluated.
    TooShort { len: usize, need: usize },
    LowTurnover { turnover: f64, threshold: f64 },
    FallingTrend { indicator: &'static str, slope: f64 },
    NoGoldenCross,
    NoVolumeCross,
    NoMacdConfirmation,
    NoHandle,
    /// A handle matched but no cup was found behind it.
    HandleWithoutCup { inner_rim: NaiveDate },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort { len, need } => {
                write!(f, "not enough data points ({len} < {need})")
            }
            SkipReason::LowTurnover {
                turnover,
                threshold,
            } => write!(f, "turnover too low ({turnover:.0} vs {threshold:.0})"),
            SkipReason::FallingTrend { indicator, slope } => {
                write!(f, "{indicator} slope is negative ({slope:.4})")
            }
            SkipReason::NoGoldenCross => write!(f, "no golden cross and falling EMA21"),
            SkipReason::NoVolumeCross => write!(f, "no volume EMA cross in window"),
            SkipReason::NoMacdConfirmation => write!(f, "no MACD confirmation"),
            SkipReason::NoHandle => write!(f, "no handle shape in range"),
            SkipReason::HandleWithoutCup { inner_rim } => {
                write!(f, "handle found at {inner_rim}, but no cup behind it")
            }
        }
    }
}

/// Result of evaluating one stock: a row, or the gate that rejected it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    Match(R),
    Skip(SkipReason),
}

impl<R> Outcome<R> {
    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Match(_))
    }

    pub fn into_match(self) -> Option<R> {
        match self {
            Outcome::Match(row) => Some(row),
            Outcome::Skip(_) => None,
        }
    }
}

// ============================================================
// SCREEN TRAIT
// ============================================================

/// A multi-stage screening pipeline over a single stock's daily series.
///
/// Implementations are pure: same series in, same outcome out, no shared
/// mutable state — which is what makes the parallel runner trivially safe.
pub trait Screen: Send + Sync {
    type Row: Send;

    fn name(&self) -> &'static str;

    /// Minimum series length; shorter series are skipped whole.
    fn min_len(&self) -> usize;

    /// Evaluate one stock. `bars` must already be validated (the runners
    /// handle that) and sorted by date ascending.
    fn evaluate<T: DailyOhlcv>(&self, symbol: &str, bars: &[T]) -> Outcome<Self::Row>;
}

// ============================================================
// BATCH RUNNERS
// ============================================================

/// A stock rejected by a gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub symbol: String,
    pub reason: SkipReason,
}

/// A stock whose input could not be evaluated at all. Isolated: it never
/// aborts the rest of the batch.
#[derive(Debug, Clone)]
pub struct ScreenFailure {
    pub symbol: String,
    pub error: ScreenError,
}

/// Everything a batch run produced. Row order follows per-stock scan order;
/// there is no internal sorting.
#[derive(Debug, Clone)]
pub struct ScreenSummary<R> {
    pub rows: Vec<R>,
    pub skipped: Vec<Skipped>,
    pub failures: Vec<ScreenFailure>,
}

impl<R> ScreenSummary<R> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }
}

fn evaluate_one<S: Screen, T: DailyOhlcv>(
    screen: &S,
    symbol: &str,
    bars: &[T],
) -> Result<Outcome<S::Row>> {
    validate_series(bars)?;
    Ok(screen.evaluate(symbol, bars))
}

fn fold_outcome<R>(
    summary: &mut ScreenSummary<R>,
    screen_name: &'static str,
    symbol: String,
    outcome: Result<Outcome<R>>,
) {
    match outcome {
        Ok(Outcome::Match(row)) => {
            debug!(screen = screen_name, symbol = %symbol, "matched");
            summary.rows.push(row);
        }
        Ok(Outcome::Skip(reason)) => {
            debug!(screen = screen_name, symbol = %symbol, %reason, "skipped");
            summary.skipped.push(Skipped { symbol, reason });
        }
        Err(error) => {
            warn!(screen = screen_name, symbol = %symbol, %error, "unreadable series");
            summary.failures.push(ScreenFailure { symbol, error });
        }
    }
}

/// Run a screen over a universe of stocks, sequentially, in scan order.
pub fn run_screen<'a, S, T, I>(screen: &S, universe: I) -> ScreenSummary<S::Row>
where
    S: Screen,
    T: DailyOhlcv + 'a,
    I: IntoIterator<Item = (&'a str, &'a [T])>,
{
    let mut summary = ScreenSummary::new();
    for (symbol, bars) in universe {
        let outcome = evaluate_one(screen, symbol, bars);
        fold_outcome(&mut summary, screen.name(), symbol.to_string(), outcome);
    }
    summary
}

/// Run a screen over a universe of stocks in parallel.
///
/// Per-stock evaluation is pure, so stocks carry no ordering dependency;
/// only the two chained matcher calls inside one stock run sequentially.
pub fn run_screen_parallel<'a, S, T, I>(screen: &S, universe: I) -> ScreenSummary<S::Row>
where
    S: Screen,
    T: DailyOhlcv + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let outcomes: Vec<(String, Result<Outcome<S::Row>>)> = universe
        .into_par_iter()
        .map(|(symbol, bars)| (symbol.to_string(), evaluate_one(screen, symbol, bars)))
        .collect();

    let mut summary = ScreenSummary::new();
    for (symbol, outcome) in outcomes {
        fold_outcome(&mut summary, screen.name(), symbol, outcome);
    }
    summary
}
