// =============================================================================
// Runtime Configuration - Hot-reloadable screener settings with atomic save
// =============================================================================
//
// Every tunable parameter of the screener service lives here so that it can
// be reconfigured at runtime (POST /api/v1/settings) without a restart.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::screener::IndicatorSettings;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_max_batch_symbols() -> usize {
    500
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the screener service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Look-back periods for Donchian and ATR.
    #[serde(default)]
    pub indicators: IndicatorSettings,

    /// Upper bound on the number of quotes accepted by one screen request.
    #[serde(default = "default_max_batch_symbols")]
    pub max_batch_symbols: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorSettings::default(),
            max_batch_symbols: default_max_batch_symbols(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;
        config.validate()?;

        info!(
            path = %path.display(),
            donchian_period = config.indicators.donchian_period,
            atr_period = config.indicators.atr_period,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Zero periods would make every indicator permanently unavailable.
    pub fn validate(&self) -> Result<()> {
        if self.indicators.donchian_period == 0 {
            bail!("donchian_period must be at least 1");
        }
        if self.indicators.atr_period == 0 {
            bail!("atr_period must be at least 1");
        }
        if self.max_batch_symbols == 0 {
            bail!("max_batch_symbols must be at least 1");
        }
        Ok(())
    }
}
