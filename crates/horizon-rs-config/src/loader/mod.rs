//! Override loading from JSON5 text and layered files.
//!
//! Discovers override files (system/user/runtime), validates each one and
//! stacks them into a single [`ConfigOverride`] that the lazy resolver then
//! lays on top of the defaults.

mod override_file;
mod schema;
mod stacking;


use crate::{ConfigError, ConfigOverride};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default override filename.
const DEFAULT_OVERRIDE_FILE: &str = "local_settings.json5";
/// Default override directory under the user's home.
const DEFAULT_OVERRIDE_DIR: &str = ".horizon";

#[cfg(not(windows))]
/// Default system override path on Unix-like systems.
const SYSTEM_OVERRIDE_PATH: &str = "/etc/horizon/local_settings.json5";
#[cfg(windows)]
/// Default system override path on Windows.
const SYSTEM_OVERRIDE_PATH: &str = "C:\\ProgramData\\horizon\\local_settings.json5";

/// Origin for a single override layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideLayerSource {
    /// System-wide deployment settings.
    System,
    /// User-specific settings.
    User,
    /// Runtime overrides (highest precedence).
    Runtime,
}

impl fmt::Display for OverrideLayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Runtime => "runtime",
        })
    }
}

/// Metadata about an override layer that was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideLayer {
    /// Layer origin.
    pub source: OverrideLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling override discovery.
#[derive(Debug, Clone)]
pub struct OverrideLoadOptions {
    /// Optional system override path (defaults to `/etc/horizon/local_settings.json5`).
    pub system_path: Option<PathBuf>,
    /// Optional user override path (defaults to `~/.horizon/local_settings.json5`).
    pub user_path: Option<PathBuf>,
    /// Runtime override paths applied last, in order.
    pub runtime_paths: Vec<PathBuf>,
}

impl Default for OverrideLoadOptions {
    fn default() -> Self {
        Self {
            system_path: override_file::default_system_override_path(),
            user_path: override_file::default_user_override_path(),
            runtime_paths: Vec::new(),
        }
    }
}

impl OverrideLoadOptions {
    /// Options with no layers at all.
    pub fn empty() -> Self {
        Self {
            system_path: None,
            user_path: None,
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl ConfigOverride {
    /// Load a single override from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading overrides from path: {}", path.display());
        let contents = fs::read_to_string(path)?;
        override_file::parse_override(&contents, &path.display().to_string())
    }

    /// Load a single override from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading overrides from raw contents (len={})", contents.len());
        override_file::parse_override(contents, "overrides")
    }

    /// Load the override stack from the default locations.
    pub fn load_layered() -> Result<(Self, Vec<OverrideLayer>), ConfigError> {
        Self::load_layered_with_options(OverrideLoadOptions::default())
    }

    /// Load the override stack from explicit locations.
    ///
    /// Layer precedence (low -> high): system, user, runtime paths. Files
    /// combine recursively among themselves; the result is then a single
    /// override for the resolver.
    pub fn load_layered_with_options(
        options: OverrideLoadOptions,
    ) -> Result<(Self, Vec<OverrideLayer>), ConfigError> {
        let candidates = [
            (OverrideLayerSource::System, options.system_path),
            (OverrideLayerSource::User, options.user_path),
        ]
        .into_iter()
        .filter_map(|(source, path)| path.map(|path| (source, path)))
        .chain(
            options
                .runtime_paths
                .into_iter()
                .map(|path| (OverrideLayerSource::Runtime, path)),
        );

        let mut overrides = ConfigOverride::default();
        let mut layers = Vec::new();
        let mut seen = HashSet::new();
        for (source, path) in candidates {
            if !seen.insert(override_file::file_identity(&path)) {
                debug!(
                    "skipping duplicate override file (source={source}, path={})",
                    path.display()
                );
                continue;
            }
            let Some(layer) = override_file::read_override_file(source, &path)? else {
                continue;
            };
            overrides.stack(layer);
            layers.push(OverrideLayer { source, path });
        }

        info!(
            "override layers loaded (layers={}, keys={})",
            layers.len(),
            overrides.key_count()
        );
        Ok((overrides, layers))
    }
}
