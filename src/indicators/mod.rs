// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// screener.  Every public calculator returns `Option<T>` so callers are
// forced to handle the insufficient-history case; `None` is the only
// "could not compute" marker and is never confused with a computed zero.

pub mod atr;
pub mod donchian;
pub mod ichimoku;
pub mod precision;
pub mod signals;
pub mod window;

pub use donchian::DonchianChannel;
pub use ichimoku::IchimokuReading;
pub use signals::{CloudBias, CloudPosition, LineCross};
