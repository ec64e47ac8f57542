//! Crew Configuration Module
//!
//! Provides per-crew configuration loaded from TOML files: the contract's
//! terrain coefficient table, rollup window lengths, the CTM/rate method
//! selectors and server settings.
//!
//! ## Loading Order
//!
//! 1. `SEISREPORT_CONFIG` environment variable (path to TOML file)
//! 2. `crew_config.toml` in the current working directory
//! 3. Built-in defaults (matching the original contract table)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(CrewConfig::load());
//!
//! // Anywhere in the codebase:
//! let week_days = config::get().rollup.week_days;
//! ```

mod crew_config;

pub use crew_config::*;

use std::sync::OnceLock;

/// Global crew configuration, initialized once at startup.
static CREW_CONFIG: OnceLock<CrewConfig> = OnceLock::new();

/// Initialize the global crew configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: CrewConfig) {
    if CREW_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global crew configuration.
///
/// Panics if `init()` has not been called. This is by design — a missing
/// config is a fatal startup error, not a recoverable condition.
pub fn get() -> &'static CrewConfig {
    CREW_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    CREW_CONFIG.get().is_some()
}
