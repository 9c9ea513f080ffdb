//! Dashboard settings: defaults, overrides, and lazy resolution.
//!
//! This crate owns the dashboard config schema, the merge that combines the
//! built-in defaults with deployment overrides, and the process-wide
//! [`HORIZON_CONFIG`] accessor that resolves on first read.

mod defaults;
mod error;
mod lazy;
mod loader;
mod merge;
mod model;

/// Built-in default configuration.
pub use defaults::default_config;
/// Public error type returned by override loading and validation APIs.
pub use error::ConfigError;
/// Lazily resolved settings holder and the process-wide instance.
pub use lazy::{HORIZON_CONFIG, LazySettings, NO_ACCESS_PERMISSION, ResolvedConfig};
/// Override layer types and loader options.
pub use loader::{OverrideLayer, OverrideLayerSource, OverrideLoadOptions};
/// Pure default/override merge.
pub use merge::merge;
/// Configuration schema models.
pub use model::*;
