//! Trend indicators: exponential and rolling means, Hull-style moving
//! average, slope and monotonic-increase checks.
//!
//! All constructors return an [`Indicator`] aligned 1:1 with the input;
//! rolling means hold `NaN` where the trailing window is incomplete.

use crate::series::Indicator;

/// Exponentially-weighted moving average with the given span.
///
/// Recursive form, `alpha = 2 / (span + 1)`, seeded from the first
/// observation: `y[0] = x[0]`, `y[t] = y[t-1] + alpha * (x[t] - y[t-1])`.
/// Crossover and slope gates are sensitive to early-window bias, so this
/// exact seeding is part of the contract.
pub fn ema(values: &[f64], span: usize) -> Indicator {
    assert!(span >= 1, "ema: span must be >= 1");
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = 0.0;
    for (t, &x) in values.iter().enumerate() {
        let y = if t == 0 { x } else { prev + alpha * (x - prev) };
        out.push(y);
        prev = y;
    }
    Indicator::new(out)
}

/// Trailing arithmetic mean over `window` observations.
///
/// Positions before the `window`-th observation are `NaN`. Each position is
/// evaluated over its own window, so a `NaN` input taints only the positions
/// whose window touches it.
pub fn rolling_mean(values: &[f64], window: usize) -> Indicator {
    assert!(window >= 1, "rolling_mean: window must be >= 1");
    let mut out = vec![f64::NAN; values.len()];
    for t in window - 1..values.len() {
        let w = &values[t + 1 - window..=t];
        out[t] = w.iter().sum::<f64>() / window as f64;
    }
    Indicator::new(out)
}

/// Hull-style moving average over `period`.
///
/// `rolling_mean(2 * RM(period/2) - RM(period), round(sqrt(period)))`, where
/// RM is the trailing simple mean — a deliberate simplification of the
/// textbook weighted HMA that the pattern thresholds are calibrated against.
pub fn hull_ma(values: &[f64], period: usize) -> Indicator {
    assert!(period >= 1, "hull_ma: period must be >= 1");
    let half = (period / 2).max(1);
    let smooth = ((period as f64).sqrt().round() as usize).max(1);
    let fast = rolling_mean(values, half);
    let slow = rolling_mean(values, period);
    let raw: Vec<f64> = fast
        .values()
        .iter()
        .zip(slow.values())
        .map(|(f, s)| 2.0 * f - s)
        .collect();
    rolling_mean(&raw, smooth)
}

/// Straight-line slope over the `points` most recent values:
/// `(at(1) - at(points)) / (points - 1)`.
///
/// Panics when fewer than `points` values exist. Screens only call this
/// after their length gate has passed, so a panic here is a contract
/// violation, not a data problem.
pub fn slope(indicator: &Indicator, points: usize) -> f64 {
    assert!(points >= 2, "slope: need at least two points");
    assert!(
        indicator.len() >= points,
        "slope: series has {} values, need {}",
        indicator.len(),
        points
    );
    (indicator.at(1) - indicator.at(points)) / (points - 1) as f64
}

/// True when the `window` most recent values are strictly increasing in
/// chronological order. A stricter trend gate than [`slope`].
///
/// Panics when fewer than `window` values exist, for the same reason as
/// [`slope`].
pub fn is_increasing(indicator: &Indicator, window: usize) -> bool {
    assert!(
        indicator.len() >= window,
        "is_increasing: series has {} values, need {}",
        indicator.len(),
        window
    );
    (1..window).all(|i| indicator.at(i) > indicator.at(i + 1))
}
