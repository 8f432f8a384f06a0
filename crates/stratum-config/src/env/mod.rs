//! Environment variable overlay for resolved configs.
//!
//! Bound leaf fields are overwritten from the environment after the
//! documents are unified. Fields nested under a keyed map are looked up with
//! the entry key as a name prefix, so `grpc.servers.main.port` reads
//! `MAIN_GRPC_PORT`.

mod coerce;
mod naming;
mod overlay;

pub use coerce::{EnvLeaf, LeafKind, LeafValue, coerce};
pub use naming::env_var_name;
pub use overlay::{EnvBindings, OverlayVisitor, apply_env_overlay};

use crate::ConfigError;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A lookup table of environment variables.
pub trait EnvSource {
    /// Return the value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads variables from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Load `KEY=VALUE` lines from `path` into the process environment.
///
/// Variables already set in the process are kept. Returns `Ok(false)` when
/// the file does not exist.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    if !path.is_file() {
        debug!("env file missing, skipping (path={})", path.display());
        return Ok(false);
    }
    dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded env file (path={})", path.display());
    Ok(true)
}
