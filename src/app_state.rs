// =============================================================================
// Application State - Screener Service
// =============================================================================
//
// The service itself is stateless with respect to market data: every request
// carries the series it wants screened.  What is shared is the runtime
// configuration and a few counters for the health endpoint.
//
// Thread safety:
//   - Atomic counter for lock-free request tracking.
//   - parking_lot::RwLock for the hot-reloadable config.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::runtime_config::RuntimeConfig;
use crate::screener::IndicatorSettings;

/// State shared across request handlers via `Arc<AppState>`.
pub struct AppState {
    /// Current runtime configuration; replaced wholesale on update.
    pub runtime_config: RwLock<RuntimeConfig>,
    /// Number of indicator/screen requests served since startup.
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            runtime_config: RwLock::new(config),
            requests_served: AtomicU64::new(0),
        }
    }

    /// Copy of the indicator settings as of now.
    pub fn indicator_settings(&self) -> IndicatorSettings {
        self.runtime_config.read().indicators
    }

    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
