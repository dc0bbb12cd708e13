// =============================================================================
// Ichimoku Cloud (Ichimoku Kinko Hyo)
// =============================================================================
//
// Every line is the midpoint `(highest high + lowest low) / 2` of a window
// counted back from the most recent bar:
//
//   Tenkan-sen      9 bars                    window (-9,   now)
//   Kijun-sen       26 bars                   window (-26,  now)
//   Senkou Span A   mean of 9 and 26 bar      windows (-35, -26), (-52, -26)
//                   midpoints, 26 bars ago
//   Senkou Span B   52 bars, 26 bars ago      window (-78,  -26)
//
// Spans A and B are plotted 26 bars forward, so the values that sit under
// today's price are the ones computed 26 bars ago.  The cloud that will form
// over the next 26 bars comes from today's data:
//
//   Future Span A   (Tenkan-sen + Kijun-sen) / 2
//   Future Span B   window (-52, now)
//
// The Chikou span is today's price plotted 26 bars back; the cloud it is
// compared against is therefore the one computed 52 bars ago:
//
//   Chikou Span A   windows (-61, -52), (-78, -52)
//   Chikou Span B   window  (-104, -52)
//
// The deepest window reaches 104 bars back, which is the minimum history.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::precision::round4;
use super::signals::{cloud_bias, cloud_position, line_cross, CloudBias, CloudPosition, LineCross};
use super::window::midpoint;
use crate::market_data::Bar;

/// Minimum number of bars needed for every window to be populated.
pub const MIN_BARS: usize = 104;

const TENKAN: (isize, Option<isize>) = (-9, None);
const KIJUN: (isize, Option<isize>) = (-26, None);

const SPAN_A_TENKAN: (isize, Option<isize>) = (-35, Some(-26));
const SPAN_A_KIJUN: (isize, Option<isize>) = (-52, Some(-26));
const SPAN_B: (isize, Option<isize>) = (-78, Some(-26));

const FUTURE_SPAN_B: (isize, Option<isize>) = (-52, None);

const CHIKOU_SPAN_A_TENKAN: (isize, Option<isize>) = (-61, Some(-52));
const CHIKOU_SPAN_A_KIJUN: (isize, Option<isize>) = (-78, Some(-52));
const CHIKOU_SPAN_B: (isize, Option<isize>) = (-104, Some(-52));

/// Every Ichimoku line plus the derived signals, all rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IchimokuReading {
    pub tenkan_sen: f64,
    pub kijun_sen: f64,
    pub senkou_span_a: f64,
    pub senkou_span_b: f64,
    /// The last traded price, plotted 26 bars in the past.
    pub chikou_span: f64,

    pub future_senkou_span_a: f64,
    pub future_senkou_span_b: f64,
    pub chikou_senkou_span_a: f64,
    pub chikou_senkou_span_b: f64,

    /// Tenkan-sen vs Kijun-sen.
    pub tk_cross: LineCross,
    /// Last price vs Kijun-sen.
    pub pk_cross: LineCross,
    pub price_to_cloud: CloudPosition,
    pub chikou_to_cloud: CloudPosition,
    pub cloud_future: CloudBias,
}

fn line(series: &[Bar], (backtrack, offset): (isize, Option<isize>)) -> Option<f64> {
    midpoint(series, backtrack, offset).filter(|v| v.is_finite())
}

fn span_a(
    series: &[Bar],
    tenkan: (isize, Option<isize>),
    kijun: (isize, Option<isize>),
) -> Option<f64> {
    Some((line(series, tenkan)? + line(series, kijun)?) / 2.0)
}

/// Compute every Ichimoku line for `series` and classify `last_price`.
///
/// Returns `None` when:
/// - There are fewer than [`MIN_BARS`] bars.
/// - Any line is non-finite.
pub fn calculate_ichimoku(series: &[Bar], last_price: f64) -> Option<IchimokuReading> {
    if series.len() < MIN_BARS {
        debug!(
            bars = series.len(),
            required = MIN_BARS,
            "Ichimoku: insufficient data"
        );
        return None;
    }

    let tenkan = line(series, TENKAN)?;
    let kijun = line(series, KIJUN)?;
    let span_a_now = span_a(series, SPAN_A_TENKAN, SPAN_A_KIJUN)?;
    let span_b_now = line(series, SPAN_B)?;

    let future_a = (tenkan + kijun) / 2.0;
    let future_b = line(series, FUTURE_SPAN_B)?;

    let chikou_a = span_a(series, CHIKOU_SPAN_A_TENKAN, CHIKOU_SPAN_A_KIJUN)?;
    let chikou_b = line(series, CHIKOU_SPAN_B)?;

    // Signals compare the rounded values, exactly as they are displayed.
    let tenkan_sen = round4(tenkan);
    let kijun_sen = round4(kijun);
    let senkou_span_a = round4(span_a_now);
    let senkou_span_b = round4(span_b_now);
    let future_senkou_span_a = round4(future_a);
    let future_senkou_span_b = round4(future_b);
    let chikou_senkou_span_a = round4(chikou_a);
    let chikou_senkou_span_b = round4(chikou_b);
    let chikou_span = last_price;

    Some(IchimokuReading {
        tenkan_sen,
        kijun_sen,
        senkou_span_a,
        senkou_span_b,
        chikou_span,
        future_senkou_span_a,
        future_senkou_span_b,
        chikou_senkou_span_a,
        chikou_senkou_span_b,
        tk_cross: line_cross(tenkan_sen, kijun_sen),
        pk_cross: line_cross(last_price, kijun_sen),
        price_to_cloud: cloud_position(last_price, senkou_span_a, senkou_span_b),
        chikou_to_cloud: cloud_position(chikou_span, chikou_senkou_span_a, chikou_senkou_span_b),
        cloud_future: cloud_bias(future_senkou_span_a, future_senkou_span_b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Day `d` (1-based) has high `100 + (d - 1)` and low `99 + (d - 1)`.
    fn rising(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        (0..n)
            .map(|i| {
                let high = 100.0 + i as f64;
                let low = 99.0 + i as f64;
                Bar {
                    symbol: "URC".into(),
                    date: start + chrono::Days::new(i as u64),
                    open: low + 0.25,
                    high,
                    low,
                    close: high - 0.25,
                    volume: 1_000.0,
                }
            })
            .collect()
    }

    fn flat(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        (0..n)
            .map(|i| Bar {
                symbol: "FLAT".into(),
                date: start + chrono::Days::new(i as u64),
                open: 50.0,
                high: 50.0,
                low: 50.0,
                close: 50.0,
                volume: 0.0,
            })
            .collect()
    }

    #[test]
    fn ichimoku_insufficient_data() {
        assert!(calculate_ichimoku(&rising(103), 200.0).is_none());
        assert!(calculate_ichimoku(&[], 200.0).is_none());
        assert!(calculate_ichimoku(&rising(104), 200.0).is_some());
    }

    #[test]
    fn ichimoku_rising_series_hand_computed() {
        // 110 bars: index i has high 100 + i and low 99 + i (i = 0..=109).
        let series = rising(110);
        let r = calculate_ichimoku(&series, 215.0).unwrap();

        // Tenkan: last 9 bars (i = 101..=109): HH 209, LL 200.
        let last9 = &series[series.len() - 9..];
        let hh = last9.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let ll = last9.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert_eq!(r.tenkan_sen, (hh + ll) / 2.0);
        assert_eq!(r.tenkan_sen, 204.5);

        // Kijun: i = 84..=109: HH 209, LL 183.
        assert_eq!(r.kijun_sen, 196.0);

        // Span A: (-35,-26) => i = 75..=83: (183 + 174) / 2 = 178.5
        //         (-52,-26) => i = 58..=83: (183 + 157) / 2 = 170
        assert_eq!(r.senkou_span_a, 174.25);
        // Span B: (-78,-26) => i = 32..=83: (183 + 131) / 2 = 157
        assert_eq!(r.senkou_span_b, 157.0);

        // Future A: (204.5 + 196) / 2; future B: i = 58..=109 => (209 + 157) / 2
        assert_eq!(r.future_senkou_span_a, 200.25);
        assert_eq!(r.future_senkou_span_b, 183.0);

        // Chikou A: (-61,-52) => i = 49..=57: (157 + 148) / 2 = 152.5
        //           (-78,-52) => i = 32..=57: (157 + 131) / 2 = 144
        assert_eq!(r.chikou_senkou_span_a, 148.25);
        // Chikou B: (-104,-52) => i = 6..=57: (157 + 105) / 2 = 131
        assert_eq!(r.chikou_senkou_span_b, 131.0);

        assert_eq!(r.chikou_span, 215.0);
        assert_eq!(r.tk_cross, LineCross::Above);
        assert_eq!(r.pk_cross, LineCross::Above);
        assert_eq!(r.price_to_cloud, CloudPosition::Above);
        assert_eq!(r.chikou_to_cloud, CloudPosition::Above);
        assert_eq!(r.cloud_future, CloudBias::Bullish);
    }

    #[test]
    fn ichimoku_price_inside_cloud() {
        let r = calculate_ichimoku(&rising(110), 160.0).unwrap();
        assert_eq!(r.price_to_cloud, CloudPosition::Inside);
        assert_eq!(r.pk_cross, LineCross::Below);
        assert_eq!(r.chikou_to_cloud, CloudPosition::Above);
    }

    #[test]
    fn ichimoku_price_on_cloud_edges() {
        let top = calculate_ichimoku(&rising(110), 174.25).unwrap();
        assert_eq!(top.price_to_cloud, CloudPosition::TopEdge);
        let bottom = calculate_ichimoku(&rising(110), 157.0).unwrap();
        assert_eq!(bottom.price_to_cloud, CloudPosition::BottomEdge);
        let below = calculate_ichimoku(&rising(110), 100.0).unwrap();
        assert_eq!(below.price_to_cloud, CloudPosition::Below);
        assert_eq!(below.chikou_to_cloud, CloudPosition::Below);
    }

    #[test]
    fn ichimoku_flat_series() {
        let r = calculate_ichimoku(&flat(120), 50.0).unwrap();
        for v in [
            r.tenkan_sen,
            r.kijun_sen,
            r.senkou_span_a,
            r.senkou_span_b,
            r.future_senkou_span_a,
            r.future_senkou_span_b,
            r.chikou_senkou_span_a,
            r.chikou_senkou_span_b,
        ] {
            assert_eq!(v, 50.0);
        }
        assert_eq!(r.tk_cross, LineCross::Cross);
        assert_eq!(r.pk_cross, LineCross::Cross);
        assert_eq!(r.price_to_cloud, CloudPosition::TopEdge);
        assert_eq!(r.chikou_to_cloud, CloudPosition::TopEdge);
        assert_eq!(r.cloud_future, CloudBias::Twist);
    }

    #[test]
    fn ichimoku_values_rounded() {
        let mut series = rising(110);
        for bar in series.iter_mut() {
            bar.high += 1.0 / 3.0;
        }
        let r = calculate_ichimoku(&series, 200.0).unwrap();
        assert_eq!(r.tenkan_sen, round4(r.tenkan_sen));
        assert_eq!(r.tenkan_sen, 204.6667);
    }

    #[test]
    fn ichimoku_idempotent() {
        let series = rising(130);
        assert_eq!(
            calculate_ichimoku(&series, 222.0),
            calculate_ichimoku(&series, 222.0)
        );
    }

    #[test]
    fn ichimoku_nan_returns_none() {
        let mut series = rising(110);
        series[105].high = f64::NAN;
        assert!(calculate_ichimoku(&series, 210.0).is_none());

        // Chikou cloud window reaches back 104 bars; a NaN there still counts.
        let mut series = rising(110);
        series[10].low = f64::NAN;
        assert!(calculate_ichimoku(&series, 210.0).is_none());

        // Older than every window: ignored.
        let mut series = rising(110);
        series[2].low = f64::NAN;
        assert!(calculate_ichimoku(&series, 210.0).is_some());
    }
}
