// =============================================================================
// Quote Screener - Library Root
// =============================================================================
//
// Technical-analysis engine for a daily stock screener: Ichimoku Cloud,
// Donchian Channel and Average True Range over one symbol's bar history,
// plus the thin HTTP service that exposes it.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod screener;

pub use screener::{analyze, screen_batch, IndicatorSettings, IndicatorSnapshot, ScreenError};
