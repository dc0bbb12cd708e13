// =============================================================================
// Screener - per-symbol indicator snapshots
// =============================================================================
//
// Pipeline for one symbol:
//   1. Reject malformed bars (non-finite prices, high below low)
//   2. Ichimoku Cloud lines + signals   (needs 104 bars)
//   3. Donchian Channel                 (needs `donchian_period` bars)
//   4. Average True Range               (needs `atr_period` bars)
//   5. Assemble an IndicatorSnapshot; each indicator is independently
//      `None` when its own history requirement is not met.
//
// Batches fan out one blocking task per symbol.  Symbols never share state,
// so a bad or short series only ever affects its own row.
// =============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::indicators::{atr, donchian, ichimoku, DonchianChannel, IchimokuReading};
use crate::market_data::{validate_series, Bar, HistoryStore, MalformedBar, Quote};

fn default_donchian_period() -> usize {
    donchian::DEFAULT_PERIOD
}

fn default_atr_period() -> usize {
    atr::DEFAULT_PERIOD
}

/// Look-back periods for the configurable indicators.  Ichimoku windows are
/// fixed by definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    #[serde(default = "default_donchian_period")]
    pub donchian_period: usize,
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            donchian_period: default_donchian_period(),
            atr_period: default_atr_period(),
        }
    }
}

/// Why a symbol produced no snapshot at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    #[error("malformed bar: {0}")]
    MalformedBar(#[from] MalformedBar),
    #[error("{symbol}: last price {price} is not a finite number")]
    InvalidPrice { symbol: String, price: f64 },
    #[error("{symbol}: worker failed: {reason}")]
    Worker { symbol: String, reason: String },
}

/// Indicator values for one symbol at one point in time.
///
/// Fields that could not be computed for lack of history are `None` and
/// serialise as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub last_price: f64,
    /// Number of bars the snapshot was computed from.
    pub bars: usize,
    pub ichimoku: Option<IchimokuReading>,
    pub donchian: Option<DonchianChannel>,
    pub atr: Option<f64>,
}

/// Compute every indicator for one symbol's series.
pub fn analyze(
    symbol: &str,
    series: &[Bar],
    last_price: f64,
    settings: &IndicatorSettings,
) -> Result<IndicatorSnapshot, ScreenError> {
    if !last_price.is_finite() {
        return Err(ScreenError::InvalidPrice {
            symbol: symbol.to_string(),
            price: last_price,
        });
    }
    validate_series(series)?;

    let snapshot = IndicatorSnapshot {
        symbol: symbol.to_string(),
        last_price,
        bars: series.len(),
        ichimoku: ichimoku::calculate_ichimoku(series, last_price),
        donchian: donchian::calculate_donchian(series, settings.donchian_period),
        atr: atr::calculate_atr(series, settings.atr_period),
    };

    debug!(
        symbol,
        bars = snapshot.bars,
        ichimoku = snapshot.ichimoku.is_some(),
        donchian = snapshot.donchian.is_some(),
        atr = ?snapshot.atr,
        "snapshot computed"
    );

    Ok(snapshot)
}

/// One row of a batch screen, in the same order as the input quotes.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenRow {
    pub symbol: String,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<IndicatorSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenRow {
    fn from_result(quote: &Quote, result: Result<IndicatorSnapshot, ScreenError>) -> Self {
        match result {
            Ok(snapshot) => Self {
                symbol: quote.symbol.clone(),
                volume: quote.volume,
                snapshot: Some(snapshot),
                error: None,
            },
            Err(e) => Self {
                symbol: quote.symbol.clone(),
                volume: quote.volume,
                snapshot: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Screen every quote against its own series from `history`, one blocking
/// task per symbol.
pub async fn screen_batch(
    quotes: Vec<Quote>,
    history: HistoryStore,
    settings: IndicatorSettings,
) -> Vec<ScreenRow> {
    let history = Arc::new(history);
    let mut rows: Vec<Option<ScreenRow>> = vec![None; quotes.len()];
    let mut tasks = JoinSet::new();

    for (idx, quote) in quotes.iter().cloned().enumerate() {
        let history = history.clone();
        tasks.spawn_blocking(move || {
            let series = history.series(&quote.symbol);
            let result = analyze(&quote.symbol, series, quote.last_price(), &settings);
            (idx, ScreenRow::from_result(&quote, result))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, row)) => {
                if let Some(err) = &row.error {
                    warn!(symbol = %row.symbol, error = %err, "symbol skipped");
                }
                rows[idx] = Some(row);
            }
            Err(e) => {
                warn!(error = %e, "screen worker failed");
            }
        }
    }

    let rows: Vec<ScreenRow> = rows
        .into_iter()
        .zip(quotes.iter())
        .map(|(row, quote)| {
            row.unwrap_or_else(|| {
                ScreenRow::from_result(
                    quote,
                    Err(ScreenError::Worker {
                        symbol: quote.symbol.clone(),
                        reason: "task did not complete".to_string(),
                    }),
                )
            })
        })
        .collect();

    let computed = rows.iter().filter(|r| r.snapshot.is_some()).count();
    info!(
        symbols = rows.len(),
        computed,
        failed = rows.len() - computed,
        "screen batch complete"
    );

    rows
}
