//! JSON output of resolved configs.

use crate::{ConfigError, ServiceConfig};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write `value` as indented JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    let write_failed = |source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(path, json).map_err(write_failed)?;
    debug!("wrote config json (path={})", path.display());
    Ok(())
}

impl ServiceConfig {
    /// Write this config as indented JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_json(self, path)
    }
}
