//! Icon lookup across a theme, its `Inherits` chain and the hicolor fallback.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::theme::{CacheError, Subdirectory, Theme, ThemeCache, FALLBACK_THEME};

pub mod size;

pub use size::{distance, matches_exactly};

/// Candidate file extensions, highest priority first.
pub const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    /// Icon base name without extension, e.g. `utilities-terminal`.
    pub icon: String,
    pub size: u32,
    pub scale: u32,
}

impl IconRequest {
    /// Size and scale are clamped to at least 1.
    pub fn new(icon: impl Into<String>, size: u32, scale: u32) -> Self {
        Self {
            icon: icon.into(),
            size: size.max(1),
            scale: scale.max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IconResolver {
    cache: Arc<ThemeCache>,
}

impl IconResolver {
    pub fn new(cache: Arc<ThemeCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ThemeCache {
        &self.cache
    }

    pub fn find(&self, theme: &str, icon: &str, size: u32, scale: u32) -> Option<PathBuf> {
        self.find_request(theme, &IconRequest::new(icon, size, scale))
    }

    /// Search `theme` and its ancestors, then hicolor and its ancestors.
    /// Each theme directory is searched at most once per call.
    pub fn find_request(&self, theme: &str, request: &IconRequest) -> Option<PathBuf> {
        let mut visited = HashSet::new();
        if let Some(path) = self.search_named(theme, request, &mut visited) {
            return Some(path);
        }

        let found = self.search_named(FALLBACK_THEME, request, &mut visited);
        if found.is_none() {
            tracing::debug!(
                theme,
                icon = %request.icon,
                size = request.size,
                scale = request.scale,
                "icon not found"
            );
        }
        found
    }

    fn search_named(
        &self,
        name: &str,
        request: &IconRequest,
        visited: &mut HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        let theme = self.load(name)?;
        self.search_tree(&theme, request, visited)
    }

    fn search_tree(
        &self,
        theme: &Theme,
        request: &IconRequest,
        visited: &mut HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        if !visited.insert(theme.dir().to_path_buf()) {
            tracing::debug!(theme = theme.name(), "theme already searched; skipping");
            return None;
        }

        if let Some(path) = search_own(theme, request) {
            return Some(path);
        }

        theme
            .parents()
            .iter()
            .find_map(|parent| self.search_named(parent, request, visited))
    }

    fn load(&self, name: &str) -> Option<Arc<Theme>> {
        match self.cache.get(name) {
            Ok(theme) => theme,
            Err(CacheError::Load { theme, source }) => {
                if source.is_not_found() {
                    tracing::debug!(
                        theme = %theme,
                        error = %source,
                        "theme has no index; skipping"
                    );
                } else {
                    tracing::warn!(
                        theme = %theme,
                        error = %source,
                        "failed to load theme; skipping"
                    );
                }
                None
            }
        }
    }
}

/// Look in `theme`'s own subdirectories only: the first exact match in
/// declaration order, otherwise the closest existing file.
pub fn search_own(theme: &Theme, request: &IconRequest) -> Option<PathBuf> {
    for subdir in theme.subdirs() {
        if !matches_exactly(subdir, request.size, request.scale) {
            continue;
        }
        if let Some(path) = existing_icon(theme, subdir, &request.icon) {
            tracing::debug!(theme = theme.name(), path = %path.display(), "exact icon match");
            return Some(path);
        }
    }

    let mut closest: Option<(u64, PathBuf)> = None;
    for subdir in theme.subdirs() {
        let gap = distance(subdir, request.size, request.scale);
        if closest.as_ref().is_some_and(|(best, _)| gap >= *best) {
            continue;
        }
        if let Some(path) = existing_icon(theme, subdir, &request.icon) {
            closest = Some((gap, path));
        }
    }

    closest.map(|(gap, path)| {
        tracing::debug!(
            theme = theme.name(),
            path = %path.display(),
            distance = gap,
            "closest icon match"
        );
        path
    })
}

fn existing_icon(theme: &Theme, subdir: &Subdirectory, icon: &str) -> Option<PathBuf> {
    let dir = theme.subdir_path(subdir);
    ICON_EXTENSIONS
        .iter()
        .map(|extension| dir.join(format!("{icon}.{extension}")))
        .find(|path| path.is_file())
}
