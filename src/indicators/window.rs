// =============================================================================
// Bar Windows - signed backward offsets into a series
// =============================================================================
//
// Every indicator in the engine looks at "the N bars ending M bars ago".  A
// window is described by a `(backtrack, offset)` pair counted from the end of
// the series:
//
//   series[len + backtrack .. len + offset]     (offset = None => ..len)
//
// Indices clamp the way slice expressions do in dynamic languages: a
// backtrack deeper than the series simply starts at the first bar, and an
// inverted range is empty.  Nothing here ever panics.
//
// Reductions come in two explicitly named flavours: `window_extrema` for the
// highest high / lowest low of any non-empty window, and `single_bar` for the
// full OHLC of a one-bar window.
// =============================================================================

use serde::Serialize;

use crate::market_data::Bar;

/// Highest high and lowest low over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extrema {
    pub highest_high: f64,
    pub lowest_low: f64,
}

impl Extrema {
    /// Midpoint of the range, the building block of every Ichimoku line.
    pub fn midpoint(&self) -> f64 {
        (self.highest_high + self.lowest_low) / 2.0
    }
}

/// Open/high/low/close of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

fn resolve(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        (index as usize).min(len)
    }
}

/// Sub-range of `series` described by a backward offset pair.
///
/// `backtrack` is where the window starts (e.g. `-9` for the last nine
/// bars); `offset` is where it stops, exclusive, or the end of the series
/// when `None`.
pub fn slice(series: &[Bar], backtrack: isize, offset: Option<isize>) -> &[Bar] {
    let len = series.len();
    let start = resolve(backtrack, len);
    let end = offset.map_or(len, |o| resolve(o, len));
    if start >= end {
        return &[];
    }
    &series[start..end]
}

/// Highest high and lowest low of `window`.
///
/// `None` for an empty window, or when any high or low in it is not finite:
/// `f64::max`/`f64::min` silently skip NaN, which would let a corrupt bar
/// vanish from the range instead of poisoning it.
pub fn window_extrema(window: &[Bar]) -> Option<Extrema> {
    let (first, rest) = window.split_first()?;
    let finite = |bar: &Bar| bar.high.is_finite() && bar.low.is_finite();
    if !finite(first) {
        return None;
    }
    let init = Extrema {
        highest_high: first.high,
        lowest_low: first.low,
    };
    rest.iter().try_fold(init, |acc, bar| {
        finite(bar).then(|| Extrema {
            highest_high: acc.highest_high.max(bar.high),
            lowest_low: acc.lowest_low.min(bar.low),
        })
    })
}

/// Full OHLC of a window that holds exactly one bar.
pub fn single_bar(window: &[Bar]) -> Option<Ohlc> {
    match window {
        [bar] => Some(Ohlc {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }),
        _ => None,
    }
}

/// `(highest high + lowest low) / 2` over the window `(backtrack, offset)`.
pub fn midpoint(series: &[Bar], backtrack: isize, offset: Option<isize>) -> Option<f64> {
    window_extrema(slice(series, backtrack, offset)).map(|e| e.midpoint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Bars whose high is `10 + i` and low `i` for i in 0..n.
    fn ramp(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        (0..n)
            .map(|i| Bar {
                symbol: "TEST".into(),
                date: start + chrono::Days::new(i as u64),
                open: i as f64 + 1.0,
                high: i as f64 + 10.0,
                low: i as f64,
                close: i as f64 + 2.0,
                volume: 0.0,
            })
            .collect()
    }

    fn lows(bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.low).collect()
    }

    #[test]
    fn slice_to_end() {
        let s = ramp(10);
        assert_eq!(lows(slice(&s, -3, None)), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn slice_with_offset() {
        let s = ramp(10);
        assert_eq!(lows(slice(&s, -5, Some(-2))), vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn slice_deeper_than_series_clamps() {
        let s = ramp(4);
        assert_eq!(slice(&s, -100, None).len(), 4);
        assert_eq!(lows(slice(&s, -100, Some(-2))), vec![0.0, 1.0]);
    }

    #[test]
    fn slice_inverted_or_out_of_range_is_empty() {
        let s = ramp(10);
        assert!(slice(&s, -2, Some(-5)).is_empty());
        assert!(slice(&s, -3, Some(-3)).is_empty());
        assert!(slice(&s, -20, Some(-15)).is_empty());
        assert!(slice(&[], -9, None).is_empty());
    }

    #[test]
    fn slice_never_panics() {
        let s = ramp(7);
        for backtrack in -12..=3 {
            for offset in -12..=3 {
                let w = slice(&s, backtrack, Some(offset));
                assert!(w.len() <= s.len());
            }
            assert!(slice(&s, backtrack, None).len() <= s.len());
        }
    }

    #[test]
    fn extrema_over_window() {
        let s = ramp(10);
        let e = window_extrema(slice(&s, -4, None)).unwrap();
        assert_eq!(e.highest_high, 19.0);
        assert_eq!(e.lowest_low, 6.0);
        assert_eq!(e.midpoint(), 12.5);
    }

    #[test]
    fn extrema_of_single_bar_is_its_range() {
        let s = ramp(3);
        let e = window_extrema(slice(&s, -1, None)).unwrap();
        assert_eq!(e.highest_high, 12.0);
        assert_eq!(e.lowest_low, 2.0);
    }

    #[test]
    fn extrema_empty_window() {
        assert!(window_extrema(&[]).is_none());
    }

    #[test]
    fn extrema_non_finite_is_none() {
        let mut s = ramp(10);
        s[4].high = f64::NAN;
        assert!(window_extrema(&s).is_none());
        // Bars after the bad one are still usable.
        assert!(window_extrema(slice(&s, -5, None)).is_some());

        let mut s = ramp(10);
        s[0].low = f64::NAN;
        assert!(window_extrema(&s).is_none());

        let mut s = ramp(10);
        s[9].high = f64::INFINITY;
        assert!(window_extrema(&s).is_none());
        assert_eq!(midpoint(&s, -3, None), None);
    }

    #[test]
    fn single_bar_requires_exactly_one() {
        let s = ramp(5);
        let ohlc = single_bar(slice(&s, -1, None)).unwrap();
        assert_eq!(
            ohlc,
            Ohlc {
                open: 5.0,
                high: 14.0,
                low: 4.0,
                close: 6.0
            }
        );
        assert!(single_bar(slice(&s, -2, None)).is_none());
        assert!(single_bar(&[]).is_none());
    }

    #[test]
    fn midpoint_of_window() {
        let s = ramp(30);
        // Bars 20..26: highs 30..=35, lows 20..=25.
        assert_eq!(midpoint(&s, -10, Some(-4)), Some((35.0 + 20.0) / 2.0));
        assert_eq!(midpoint(&s, -40, Some(-35)), None);
    }
}
