//! Resolution pipeline: env file, document unification, decode, env overlay.
//!
//! The default schema layer and the user document are unified, the
//! `service` field of the result is decoded into a [`ServiceConfig`], and
//! bound fields are then overwritten from the process environment.

#[cfg(test)]
mod tests;

use crate::env::{EnvSource, ProcessEnv, apply_env_overlay, load_env_file};
use crate::schema::{self, DefaultSource, SchemaOverlay};
use crate::{ConfigError, ServiceConfig};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level field of the unified document holding the service config.
pub const SERVICE_FIELD: &str = "service";

/// Inputs for a single resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Default schema layer (bundled documents unless overridden).
    pub defaults: DefaultSource,
    /// User override document.
    pub user_path: PathBuf,
    /// Optional `.env` file loaded before resolving; missing files are skipped.
    pub env_file: Option<PathBuf>,
}

impl ResolveOptions {
    /// Resolve `user_path` against the bundled defaults.
    pub fn new(user_path: impl AsRef<Path>) -> Self {
        Self {
            defaults: DefaultSource::Bundled,
            user_path: user_path.as_ref().to_path_buf(),
            env_file: None,
        }
    }

    /// Load `path` into the process environment before resolving.
    pub fn with_env_file(mut self, path: impl AsRef<Path>) -> Self {
        self.env_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the default schema layer.
    pub fn with_defaults(mut self, defaults: DefaultSource) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Run the full pipeline against the process environment.
pub fn resolve(options: &ResolveOptions) -> Result<ServiceConfig, ConfigError> {
    if let Some(env_file) = options.env_file.as_deref() {
        load_env_file(env_file)?;
    }
    let mut config = ServiceConfig::from_documents(&options.defaults, &options.user_path)?;
    let applied = apply_env_overlay(&mut config, &ProcessEnv)?;
    info!(
        "resolved service config (name={}, env_overrides={applied})",
        config.name
    );
    Ok(config)
}

impl ServiceConfig {
    /// Resolve a user document against the bundled defaults.
    ///
    /// `env_file` is loaded into the process environment first when it exists.
    pub fn resolve(
        user_path: impl AsRef<Path>,
        env_file: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        resolve(&ResolveOptions::new(user_path).with_env_file(env_file))
    }

    /// Resolve with explicit options.
    pub fn resolve_with_options(options: &ResolveOptions) -> Result<Self, ConfigError> {
        resolve(options)
    }

    /// Like [`ServiceConfig::resolve`], but panics on any error.
    pub fn must_resolve(user_path: impl AsRef<Path>, env_file: impl AsRef<Path>) -> Self {
        match Self::resolve(user_path, env_file) {
            Ok(config) => config,
            Err(err) => panic!("failed to resolve service config: {err}"),
        }
    }

    /// Unify the default layer with a user document on disk and decode it.
    ///
    /// The environment is not consulted.
    pub fn from_documents(
        defaults: &DefaultSource,
        user_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let user_path = user_path.as_ref();
        info!("loading user config from path: {}", user_path.display());
        let contents = fs::read_to_string(user_path)?;
        let overlay = defaults.overlay()?;
        Self::from_sources(&overlay, &user_path.display().to_string(), &contents)
    }

    /// Unify in-memory default documents with user document contents.
    pub fn from_sources(
        defaults: &SchemaOverlay,
        user_label: &str,
        user_contents: &str,
    ) -> Result<Self, ConfigError> {
        let default_node = schema::load_defaults(defaults)?;
        let user_node = schema::load_document(user_label, user_contents)?;
        let unified = schema::unify(default_node, user_node, "")?;
        debug!(
            "unified documents (defaults={}, user={user_label})",
            defaults.len()
        );

        let service = unified
            .field(SERVICE_FIELD)
            .ok_or_else(|| ConfigError::MissingField {
                path: SERVICE_FIELD.to_string(),
            })?;
        let value = schema::export(service, SERVICE_FIELD)?;
        let config: ServiceConfig = serde_json::from_value(value)?;
        Ok(config)
    }

    /// Overwrite bound fields from the process environment.
    ///
    /// Returns the number of fields overwritten. On error some fields may
    /// already have been overwritten.
    pub fn apply_env(&mut self) -> Result<usize, ConfigError> {
        apply_env_overlay(self, &ProcessEnv)
    }

    /// Overwrite bound fields from an explicit variable source.
    pub fn apply_env_from(&mut self, env: &dyn EnvSource) -> Result<usize, ConfigError> {
        apply_env_overlay(self, env)
    }
}
