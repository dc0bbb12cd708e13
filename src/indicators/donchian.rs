// =============================================================================
// Donchian Channel
// =============================================================================
//
// Upper band = highest high of the last `period` bars.
// Lower band = lowest low of the last `period` bars.
//
// Default period: 20
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::precision::round4;
use super::window::{single_bar, slice, window_extrema};
use crate::market_data::Bar;

/// Default Donchian look-back.
pub const DEFAULT_PERIOD: usize = 20;

/// Result of a Donchian Channel calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DonchianChannel {
    pub highest_high: f64,
    pub lowest_low: f64,
}

/// Compute the Donchian Channel over the most recent `period` bars.
///
/// Returns `None` when:
/// - `period` is zero.
/// - There are fewer than `period` bars.
/// - Either bound is non-finite.
pub fn calculate_donchian(series: &[Bar], period: usize) -> Option<DonchianChannel> {
    if period == 0 || series.len() < period {
        debug!(
            bars = series.len(),
            period, "Donchian: insufficient data"
        );
        return None;
    }

    let window = slice(series, -(period as isize), None);
    let (high, low) = if period == 1 {
        let bar = single_bar(window)?;
        (bar.high, bar.low)
    } else {
        let e = window_extrema(window)?;
        (e.highest_high, e.lowest_low)
    };

    if !high.is_finite() || !low.is_finite() {
        return None;
    }

    Some(DonchianChannel {
        highest_high: round4(high),
        lowest_low: round4(low),
    })
}

/// Convenience function: Donchian Channel with the standard 20-period default.
pub fn calculate(series: &[Bar]) -> Option<DonchianChannel> {
    calculate_donchian(series, DEFAULT_PERIOD)
}
