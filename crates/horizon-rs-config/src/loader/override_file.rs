//! Reading a single override file.

use super::{
    DEFAULT_OVERRIDE_DIR, DEFAULT_OVERRIDE_FILE, OverrideLayerSource, SYSTEM_OVERRIDE_PATH, schema,
};
use crate::{ConfigError, ConfigOverride};
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read and validate the override file for one layer.
///
/// System and user files are optional and yield `None` when absent. Runtime
/// files were named by the caller, so a missing one is an error.
pub(super) fn read_override_file(
    source: OverrideLayerSource,
    path: &Path,
) -> Result<Option<ConfigOverride>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound && source != OverrideLayerSource::Runtime => {
            debug!(
                "override file absent (source={source}, path={})",
                path.display()
            );
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    debug!(
        "read override file (source={source}, path={}, len={})",
        path.display(),
        contents.len()
    );
    parse_override(&contents, &format!("{source}({})", path.display())).map(Some)
}

/// Parse JSON5 override text, checking it against the schema first.
pub(super) fn parse_override(contents: &str, label: &str) -> Result<ConfigOverride, ConfigError> {
    let value: Value = json5::from_str(contents)?;
    schema::validate_override_schema(&value, label)?;
    Ok(serde_json::from_value(value)?)
}

/// Key identifying a file on disk, so one file listed twice loads once.
pub(super) fn file_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

pub(super) fn default_system_override_path() -> Option<PathBuf> {
    Some(PathBuf::from(SYSTEM_OVERRIDE_PATH))
}

/// `~/.horizon/local_settings.json5`, when a home directory is known.
pub(super) fn default_user_override_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_OVERRIDE_DIR)
            .join(DEFAULT_OVERRIDE_FILE)
    })
}
