//! Exchange-suffix keyed minimum-turnover thresholds.
//!
//! Symbols carry their venue as a suffix ("7203.T", "USDJPY=X"); each venue
//! trades in a different currency and size regime, so the cup-and-handle
//! screen takes a per-suffix turnover floor. The table is an explicit
//! immutable configuration value passed into the screen, never ambient state.

use std::collections::HashMap;

/// Venue suffix of a symbol: the text after `=`, else after the last `.`,
/// else none.
pub fn suffix_of(symbol: &str) -> Option<&str> {
    if let Some((_, suffix)) = symbol.rsplit_once('=') {
        return Some(suffix);
    }
    symbol.rsplit_once('.').map(|(_, suffix)| suffix)
}

/// Minimum-turnover thresholds keyed by venue suffix, with a default for
/// unmapped suffixes (and for symbols without one).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TurnoverThresholds {
    pub default: f64,
    pub by_suffix: HashMap<String, f64>,
}

impl Default for TurnoverThresholds {
    fn default() -> Self {
        let by_suffix = [
            ("T", 1.4e9),
            ("L", 7.8e6),
            ("T0", 1.34e7),
            ("SI", 1.34e7),
            ("HK", 1.25e6),
            ("X", 0.0),
            ("F", 0.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            default: 1e7,
            by_suffix,
        }
    }
}

impl TurnoverThresholds {
    /// Threshold for a symbol, resolved through its venue suffix.
    pub fn for_symbol(&self, symbol: &str) -> f64 {
        suffix_of(symbol)
            .and_then(|s| self.by_suffix.get(s).copied())
            .unwrap_or(self.default)
    }
}
