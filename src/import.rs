//! Where `_import` entries and [`Stylesheet::load_file()`](crate::Stylesheet::load_file)
//! get their text from.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::LoadError;

const EXTENSION: &str = "yaml";

/// Reduce an import reference to the document name resolvers look up:
/// the last `/` component, without a `.yaml` suffix.
///
/// ```
/// assert_eq!(cascade::import::document_name("themes/dark.yaml"), "dark");
/// assert_eq!(cascade::import::document_name("base"), "base");
/// ```
#[must_use]
pub fn document_name(reference: &str) -> &str {
    let leaf = reference.rsplit('/').next().unwrap_or(reference);
    leaf.strip_suffix(".yaml").unwrap_or(leaf)
}

/// Source of stylesheet text, keyed by document name.
pub trait ImportResolver: Send + Sync + fmt::Debug {
    /// Return the raw text of document `name`.
    ///
    /// # Errors
    ///
    /// [`LoadError::ImportNotFound`] when no such document exists, or
    /// [`LoadError::Io`] when it exists but cannot be read.
    fn resolve(&self, name: &str) -> Result<String, LoadError>;
}

fn not_found(name: &str) -> LoadError {
    LoadError::ImportNotFound {
        file: name.to_owned(),
    }
}

/// Rejects every import. The default for a [`Stylesheet`](crate::Stylesheet).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl ImportResolver for NoImports {
    fn resolve(&self, name: &str) -> Result<String, LoadError> {
        Err(not_found(name))
    }
}

/// Reads `<dir>/<name>.yaml`.
#[derive(Debug, Clone)]
pub struct FileResolver {
    dir: PathBuf,
}

impl FileResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path a document name maps to.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }
}

impl ImportResolver for FileResolver {
    fn resolve(&self, name: &str) -> Result<String, LoadError> {
        let path = self.path_of(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(not_found(name)),
            Err(err) => Err(err.into()),
        }
    }
}

/// Documents held in memory, for embedding and tests.
///
/// ```
/// use cascade::import::{ImportResolver, MemoryResolver};
///
/// let resolver = MemoryResolver::new().with("palette", "Palette: {accent: 1}");
/// assert!(resolver.resolve("palette").is_ok());
/// assert!(resolver.resolve("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    documents: HashMap<String, String>,
}

impl MemoryResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.documents.insert(name.to_owned(), text.to_owned());
    }
}

impl ImportResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<String, LoadError> {
        self.documents.get(name).cloned().ok_or_else(|| not_found(name))
    }
}
