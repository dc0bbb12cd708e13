use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Quote list payload
// ---------------------------------------------------------------------------
//
// Shape of the exchange quote list the presentation layer already holds:
//
//   { "stock": [ { "name": "...", "symbol": "JFC",
//                  "price": { "currency": "PHP", "amount": 250.4 },
//                  "percent_change": -0.4, "volume": 61270 } ],
//     "as_of": "2018-03-16T15:20:00+08:00" }
//
// Only `symbol`, `price.amount` and `volume` feed the screener.

/// Price block of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotePrice {
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One row of the exchange quote list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub price: QuotePrice,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub percent_change: Option<f64>,
}

impl Quote {
    /// Last traded price; may be fresher than the last bar's close.
    pub fn last_price(&self) -> f64 {
        self.price.amount
    }
}
