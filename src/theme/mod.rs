//! Icon theme data model: a theme directory, its declared parents and its
//! size buckets.

use std::path::{Path, PathBuf};

mod cache;
mod index;

pub use cache::{CacheError, CacheResult, ThemeCache};
pub use index::{parse_index, read_theme, IndexError, IndexResult, ThemeIndex, INDEX_FILE};

pub const FALLBACK_THEME: &str = "hicolor";

/// Kind of size bucket declared by a subdirectory's `Type` key.
///
/// `Threshold` is not supported; subdirectories declaring it (or nothing)
/// carry no kind and are only used as a last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubdirKind {
    Fixed,
    Scalable,
}

impl SubdirKind {
    pub fn from_index_value(value: &str) -> Option<Self> {
        match value {
            "Fixed" => Some(Self::Fixed),
            "Scalable" => Some(Self::Scalable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subdirectory {
    /// Path relative to the owning theme directory.
    pub relpath: PathBuf,
    pub kind: Option<SubdirKind>,
    pub size: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub scale: u32,
}

impl Subdirectory {
    pub fn new(relpath: impl Into<PathBuf>) -> Self {
        Self {
            relpath: relpath.into(),
            kind: None,
            size: 0,
            min_size: 0,
            max_size: 0,
            scale: 1,
        }
    }

    pub fn fixed(relpath: impl Into<PathBuf>, size: u32, scale: u32) -> Self {
        Self {
            kind: Some(SubdirKind::Fixed),
            size,
            min_size: size,
            max_size: size,
            scale,
            ..Self::new(relpath)
        }
    }

    pub fn scalable(
        relpath: impl Into<PathBuf>,
        size: u32,
        min_size: u32,
        max_size: u32,
        scale: u32,
    ) -> Self {
        Self {
            kind: Some(SubdirKind::Scalable),
            size,
            min_size,
            max_size,
            scale,
            ..Self::new(relpath)
        }
    }
}

/// A parsed theme. Immutable once built; shared through [`ThemeCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    dir: PathBuf,
    parents: Vec<String>,
    subdirs: Vec<Subdirectory>,
}

impl Theme {
    pub fn new(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        parents: Vec<String>,
        subdirs: Vec<Subdirectory>,
    ) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            parents,
            subdirs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute directory holding `index.theme`; also the theme's identity.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parent theme names in `Inherits` order, unresolved.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn subdirs(&self) -> &[Subdirectory] {
        &self.subdirs
    }

    pub fn subdir_path(&self, subdir: &Subdirectory) -> PathBuf {
        self.dir.join(&subdir.relpath)
    }
}
