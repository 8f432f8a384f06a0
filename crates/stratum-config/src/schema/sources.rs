//! Where default schema documents come from.

use crate::ConfigError;
use globset::{Glob, GlobMatcher};
use log::debug;
use rust_embed::RustEmbed;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Schema documents shipped with the crate.
#[derive(RustEmbed)]
#[folder = "defaults/"]
struct BundledDefaults;

/// Virtual directory bundled documents are exposed under.
const BUNDLED_ROOT: &str = "defaults";
/// Files treated as schema documents.
const SCHEMA_GLOB: &str = "*.json5";

/// In-memory schema documents keyed by virtual path.
///
/// All documents in an overlay are unified together as the default layer,
/// in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOverlay {
    files: BTreeMap<String, Vec<u8>>,
}

impl SchemaOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// The documents embedded in this crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        let matcher = schema_matcher()?;
        let mut overlay = Self::new();
        for name in BundledDefaults::iter() {
            if !matcher.is_match(&*name) {
                continue;
            }
            if let Some(file) = BundledDefaults::get(name.as_ref()) {
                overlay.insert(format!("{BUNDLED_ROOT}/{name}"), file.data.into_owned());
            }
        }
        debug!("loaded bundled schema overlay (files={})", overlay.len());
        Ok(overlay)
    }

    /// Read every `*.json5` document below `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let matcher = schema_matcher()?;
        let mut overlay = Self::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|err| ConfigError::ReadFailed(err.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            if !matcher.is_match(relative) {
                continue;
            }
            let contents = fs::read(entry.path())?;
            overlay.insert(entry.path().display().to_string(), contents);
        }
        debug!(
            "loaded schema overlay from directory (dir={}, files={})",
            dir.display(),
            overlay.len()
        );
        Ok(overlay)
    }

    /// Add or replace a document, returning the previous contents.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Option<Vec<u8>> {
        self.files.insert(path.into(), contents.into())
    }

    /// Builder-style [`SchemaOverlay::insert`].
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Virtual paths of the documents, in unification order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
    }
}

/// Origin of the default schema layer.
#[derive(Debug, Clone, Default)]
pub enum DefaultSource {
    /// Documents embedded in the crate.
    #[default]
    Bundled,
    /// Documents read from a directory at resolve time.
    Directory(PathBuf),
    /// Documents supplied in memory.
    Overlay(SchemaOverlay),
}

impl DefaultSource {
    /// Materialise the documents of this source.
    pub fn overlay(&self) -> Result<SchemaOverlay, ConfigError> {
        match self {
            DefaultSource::Bundled => SchemaOverlay::bundled(),
            DefaultSource::Directory(dir) => SchemaOverlay::from_dir(dir),
            DefaultSource::Overlay(overlay) => Ok(overlay.clone()),
        }
    }
}

fn schema_matcher() -> Result<GlobMatcher, ConfigError> {
    Glob::new(SCHEMA_GLOB)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| ConfigError::Schema {
            path: SCHEMA_GLOB.to_string(),
            message: err.to_string(),
        })
}
