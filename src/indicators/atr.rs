// =============================================================================
// Average True Range (ATR) - Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// The calculation only looks at the last `2 * period` bars: the first
// `period` true ranges seed the average and the rest are smoothed.
//
// True Range (TR) for each bar in that window:
//   first bar: TR = H - L                       (no previous close in window)
//   others:    TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// Each candidate is rounded to 4 decimals before the max is taken, and the
// winner is rounded again.
//
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Default period: 20
// =============================================================================

use tracing::debug;

use super::precision::round4;
use super::window::slice;
use crate::market_data::Bar;

/// Default ATR look-back.
pub const DEFAULT_PERIOD: usize = 20;

/// Rounded true range of every bar in the last `2 * period` bars, oldest
/// first.  The first bar of the window only contributes its own high-low
/// range.  A bar with a non-finite price yields `NaN`.
pub fn calculate_true_ranges(series: &[Bar], period: usize) -> Vec<f64> {
    let window = slice(series, -(2 * period as isize), None);

    let mut tr_values: Vec<f64> = Vec::with_capacity(window.len());
    for (i, bar) in window.iter().enumerate() {
        let hl = round4(bar.high - bar.low);
        if i == 0 {
            tr_values.push(hl);
            continue;
        }

        let prev_close = window[i - 1].close;
        let hc = round4(bar.high - prev_close).abs();
        let lc = round4(bar.low - prev_close).abs();

        // f64::max silently drops NaN; keep it so the caller can reject it.
        if hl.is_finite() && hc.is_finite() && lc.is_finite() {
            tr_values.push(round4(hl.max(hc).max(lc)));
        } else {
            tr_values.push(f64::NAN);
        }
    }
    tr_values
}

/// Compute the most recent ATR value from a series of daily bars using
/// Wilder's smoothing method.
///
/// # Arguments
/// - `series` - bars, oldest first.
/// - `period` - look-back window for the ATR calculation.
///
/// # Returns
/// `None` when:
/// - `period` is zero.
/// - There are fewer than `period` bars.
/// - Any intermediate value is non-finite.
pub fn calculate_atr(series: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        debug!(bars = series.len(), period, "ATR: insufficient data");
        return None;
    }

    // --- Step 1: True Range over the last 2 * period bars -------------------
    let tr_values = calculate_true_ranges(series, period);
    if tr_values.len() < period {
        return None;
    }

    // --- Step 2: Seed ATR with SMA of first `period` TR values ---------------
    let seed: f64 = tr_values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return None;
    }

    // --- Step 3: Wilder's smoothing for remaining TR values ------------------
    let period_f = period as f64;
    let mut atr = seed;
    for &tr in &tr_values[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            return None;
        }
    }

    Some(round4(atr))
}

/// Convenience function: compute ATR with the standard 20-period default.
pub fn calculate(series: &[Bar]) -> Option<f64> {
    calculate_atr(series, DEFAULT_PERIOD)
}
