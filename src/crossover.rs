//! Crossover detection between two aligned indicator series.

use chrono::NaiveDate;

use crate::series::{recent, Indicator};

/// True iff `a` crosses above `b` at most-recent-relative index `i`:
/// strictly below one step further back, strictly above at `i`.
///
/// Ties at either point are not crossings, and neither are probes past the
/// start of the series (a window reaching beyond the data simply finds no
/// cross there).
#[inline]
pub fn crosses_above(a: &Indicator, b: &Indicator, i: usize) -> bool {
    let (Some(a_prev), Some(b_prev), Some(a_cur), Some(b_cur)) =
        (a.get(i + 1), b.get(i + 1), a.get(i), b.get(i))
    else {
        return false;
    };
    a_prev < b_prev && a_cur > b_cur
}

/// Scan relative indices `begin ..= begin + period`, in increasing order,
/// for the first index where `a` crosses above `b`; return its date.
///
/// Indices increase while calendar time moves backward, so the first hit is
/// the **most recent** qualifying cross within the window — downstream
/// screens report it as "the" crossover date, so the scan order is part of
/// the contract.
pub fn crosses_within(
    a: &Indicator,
    b: &Indicator,
    dates: &[NaiveDate],
    begin: usize,
    period: usize,
) -> Option<NaiveDate> {
    for i in begin..=begin + period {
        if crosses_above(a, b, i) {
            return recent(dates, i).copied();
        }
    }
    None
}
