use std::collections::HashMap;

use tracing::debug;

use super::bar::Bar;

// ---------------------------------------------------------------------------
// HistoryStore -- per-symbol series built from a flat list of bars
// ---------------------------------------------------------------------------

/// Groups a flat, mixed-symbol bar list into one chronological series per
/// symbol.  The store is built per request and handed to the screener as an
/// explicit parameter; nothing global is ever consulted.
#[derive(Debug, Default)]
pub struct HistoryStore {
    series: HashMap<String, Vec<Bar>>,
}

impl HistoryStore {
    /// Build a store from bars in any order.  Each series is sorted oldest
    /// first; bars sharing a date keep their relative input order.
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut series: HashMap<String, Vec<Bar>> = HashMap::new();
        for bar in bars {
            series.entry(bar.symbol.clone()).or_default().push(bar);
        }
        for (symbol, bars) in series.iter_mut() {
            bars.sort_by_key(|b| b.date);
            debug!(symbol = %symbol, bars = bars.len(), "series assembled");
        }
        Self { series }
    }

    /// The full series for `symbol`, oldest first.  Unknown symbols yield an
    /// empty slice so that every indicator reports insufficient data.
    pub fn series(&self, symbol: &str) -> &[Bar] {
        self.series.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of bars stored for `symbol`.
    pub fn len(&self, symbol: &str) -> usize {
        self.series(symbol).len()
    }

    /// Number of distinct symbols.
    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }
}
