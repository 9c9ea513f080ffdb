//! Public surface for the dashboard crates.
//!
//! This crate re-exports the settings and dashboard building blocks and
//! provides a small startup helper so embedding applications wire them up
//! the same way.

/// Re-export for convenience.
pub use horizon_rs_config as config;
/// Re-export for convenience.
pub use horizon_rs_dashboard as dashboard;

use horizon_rs_config::{ConfigError, ConfigOverride, HORIZON_CONFIG, OverrideLoadOptions};
use log::info;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Load the deployment overrides and install them on [`HORIZON_CONFIG`].
///
/// Resolution still happens on the first read; this only stages the override.
pub fn configure_from_files(options: OverrideLoadOptions) -> Result<(), ConfigError> {
    let (overrides, layers) = ConfigOverride::load_layered_with_options(options)?;
    info!("installing dashboard overrides (layers={})", layers.len());
    HORIZON_CONFIG.configure(overrides);
    Ok(())
}
