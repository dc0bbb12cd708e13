// =============================================================================
// Daily Bar - one trading day's quote for a single symbol
// =============================================================================
//
// A `Series` is simply `&[Bar]` in chronological ascending order (oldest
// first, most recent last).  Every backward offset used by the indicator
// engine counts from the end of that slice, so the ordering is load-bearing.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Historical feeds label the ticker `code`; quote lists use `symbol`.
    #[serde(alias = "code")]
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Reason a bar was rejected before any indicator was computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedBar {
    #[error("{symbol} {date}: non-finite {field} value")]
    NonFinite {
        symbol: String,
        date: NaiveDate,
        field: &'static str,
    },
    #[error("{symbol} {date}: high {high} is below low {low}")]
    Inverted {
        symbol: String,
        date: NaiveDate,
        high: f64,
        low: f64,
    },
}

impl Bar {
    /// Reject bars that would make every downstream indicator meaningless:
    /// NaN/inf prices or a high below the low.
    pub fn validate(&self) -> Result<(), MalformedBar> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(MalformedBar::NonFinite {
                    symbol: self.symbol.clone(),
                    date: self.date,
                    field,
                });
            }
        }

        if self.high < self.low {
            return Err(MalformedBar::Inverted {
                symbol: self.symbol.clone(),
                date: self.date,
                high: self.high,
                low: self.low,
            });
        }

        Ok(())
    }
}

/// Validate every bar of a series, stopping at the first bad one.
pub fn validate_series(series: &[Bar]) -> Result<(), MalformedBar> {
    series.iter().try_for_each(Bar::validate)
}
