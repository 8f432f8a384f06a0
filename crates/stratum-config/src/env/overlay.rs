//! Depth-first traversal applying environment values to bound fields.

use super::{EnvLeaf, EnvSource, env_var_name};
use crate::ConfigError;
use log::{debug, trace};
use std::collections::BTreeMap;

/// Declares the environment bindings of a config section.
///
/// Implementations visit their fields in declaration order, calling
/// [`OverlayVisitor::leaf`] for bound primitives and the structural
/// methods for nested sections.
pub trait EnvBindings {
    fn visit_env(&mut self, visitor: &mut OverlayVisitor<'_>) -> Result<(), ConfigError>;
}

/// Walks a config, carrying the map-key prefix of the current entry.
pub struct OverlayVisitor<'a> {
    env: &'a dyn EnvSource,
    prefix: Option<String>,
    applied: usize,
}

impl<'a> OverlayVisitor<'a> {
    /// Create a visitor with an empty prefix.
    pub fn new(env: &'a dyn EnvSource) -> Self {
        Self {
            env,
            prefix: None,
            applied: 0,
        }
    }

    /// Number of fields overwritten so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Overwrite `slot` when the variable bound to `base` is set and non-empty.
    pub fn leaf<T: EnvLeaf>(&mut self, base: &str, slot: &mut T) -> Result<(), ConfigError> {
        let name = env_var_name(base, self.prefix.as_deref());
        let Some(raw) = self.env.var(&name).filter(|raw| !raw.is_empty()) else {
            return Ok(());
        };
        *slot = T::from_env(&name, &raw)?;
        self.applied += 1;
        debug!("applied env override (var={name}, kind={})", T::KIND);
        Ok(())
    }

    /// Visit a nested section under the current prefix.
    pub fn section<S: EnvBindings>(&mut self, section: &mut S) -> Result<(), ConfigError> {
        section.visit_env(self)
    }

    /// Visit an optional section; absent sections are never created.
    pub fn optional<S: EnvBindings>(&mut self, section: &mut Option<S>) -> Result<(), ConfigError> {
        match section.as_mut() {
            Some(section) => section.visit_env(self),
            None => Ok(()),
        }
    }

    /// Visit every entry of a keyed map with the entry key as prefix.
    ///
    /// The key replaces any enclosing prefix for the duration of the entry.
    pub fn keyed<S: EnvBindings>(
        &mut self,
        entries: &mut BTreeMap<String, S>,
    ) -> Result<(), ConfigError> {
        for (key, entry) in entries.iter_mut() {
            trace!("visiting keyed entry (key={key})");
            let enclosing = self.prefix.replace(key.clone());
            let result = entry.visit_env(self);
            self.prefix = enclosing;
            result?;
        }
        Ok(())
    }
}

/// Apply environment overrides from `env` to every bound field of `config`.
///
/// Stops at the first conversion failure. Fields overwritten before the
/// failure keep their new values, so callers must discard `config` on error.
pub fn apply_env_overlay<T: EnvBindings>(
    config: &mut T,
    env: &dyn EnvSource,
) -> Result<usize, ConfigError> {
    let mut visitor = OverlayVisitor::new(env);
    config.visit_env(&mut visitor)?;
    Ok(visitor.applied())
}
