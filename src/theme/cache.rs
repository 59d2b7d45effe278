use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use thiserror::Error;

use super::index::{read_theme, IndexError};
use super::Theme;
use crate::config::{default_search_roots, AppConfig};

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// A theme that could not be built. Cloned to every caller asking for it.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("failed to load icon theme {theme}")]
    Load {
        theme: String,
        #[source]
        source: Arc<IndexError>,
    },
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Load { source, .. } => source.is_not_found(),
        }
    }
}

type ThemeSlot = Arc<OnceLock<Result<Arc<Theme>, Arc<IndexError>>>>;

/// Resolves theme names against the search roots and parses each theme
/// directory at most once for the lifetime of the cache.
#[derive(Debug)]
pub struct ThemeCache {
    roots: Vec<PathBuf>,
    themes: RwLock<HashMap<PathBuf, ThemeSlot>>,
    parses: AtomicUsize,
}

impl ThemeCache {
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            themes: RwLock::new(HashMap::new()),
            parses: AtomicUsize::new(0),
        }
    }

    pub fn with_default_roots() -> Self {
        Self::with_roots(default_search_roots())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_roots(config.search_roots())
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// First `<root>/<name>` directory that exists, canonicalized.
    pub fn theme_dir(&self, name: &str) -> Option<PathBuf> {
        let dir = self
            .roots
            .iter()
            .map(|root| root.join(name))
            .find(|dir| dir.is_dir())?;
        Some(canonical_dir(dir))
    }

    /// `Ok(None)` when no search root holds the theme.
    pub fn get(&self, name: &str) -> CacheResult<Option<Arc<Theme>>> {
        let Some(dir) = self.theme_dir(name) else {
            tracing::debug!(theme = name, "theme directory not found in any search root");
            return Ok(None);
        };

        let slot = self.slot(&dir);
        let loaded = slot.get_or_init(|| {
            self.parses.fetch_add(1, Ordering::Relaxed);
            read_theme(name, &dir).map(Arc::new).map_err(Arc::new)
        });

        match loaded {
            Ok(theme) => Ok(Some(Arc::clone(theme))),
            Err(source) => Err(CacheError::Load {
                theme: name.to_string(),
                source: Arc::clone(source),
            }),
        }
    }

    /// Number of index files parsed so far.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, dir: &Path) -> ThemeSlot {
        if let Some(slot) = self
            .themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dir)
        {
            return Arc::clone(slot);
        }

        let mut themes = self.themes.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(themes.entry(dir.to_path_buf()).or_default())
    }
}

fn canonical_dir(dir: PathBuf) -> PathBuf {
    fs::canonicalize(&dir)
        .or_else(|_| std::path::absolute(&dir))
        .unwrap_or(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::INDEX_FILE;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("iconpath-cache-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    fn write_theme(root: &Path, name: &str, index: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), index).unwrap();
    }

    #[test]
    fn missing_theme_is_absent_not_an_error() {
        with_temp_root(|root| {
            let cache = ThemeCache::with_roots(vec![root.to_path_buf()]);
            assert!(cache.get("nope").unwrap().is_none());
            assert_eq!(cache.parse_count(), 0);
        });
    }

    #[test]
    fn repeated_lookups_parse_index_once() {
        with_temp_root(|root| {
            write_theme(root, "alpha", "[Icon Theme]\nDirectories=\n");
            let cache = ThemeCache::with_roots(vec![root.to_path_buf()]);

            let first = cache.get("alpha").unwrap().unwrap();
            let second = cache.get("alpha").unwrap().unwrap();
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(cache.parse_count(), 1);
            assert_eq!(cache.len(), 1);
        });
    }

    #[test]
    fn first_root_containing_theme_wins() {
        with_temp_root(|root| {
            let user = root.join("user");
            let system = root.join("system");
            write_theme(&user, "shared", "[Icon Theme]\nInherits=from-user\n");
            write_theme(&system, "shared", "[Icon Theme]\nInherits=from-system\n");
            write_theme(&system, "only-system", "[Icon Theme]\n");

            let cache = ThemeCache::with_roots(vec![user.clone(), system.clone()]);
            let shared = cache.get("shared").unwrap().unwrap();
            assert_eq!(shared.parents(), ["from-user".to_string()]);
            assert_eq!(shared.dir(), fs::canonicalize(user.join("shared")).unwrap());

            let only_system = cache.get("only-system").unwrap().unwrap();
            assert!(only_system.dir().ends_with("only-system"));
            assert!(only_system.dir().is_absolute());
        });
    }

    #[test]
    fn parse_failure_is_memoized_and_isolated() {
        with_temp_root(|root| {
            write_theme(
                root,
                "broken",
                "[Icon Theme]\nDirectories=a\n[a]\nType=Fixed\nSize=x\n",
            );
            write_theme(root, "fine", "[Icon Theme]\n");
            let cache = ThemeCache::with_roots(vec![root.to_path_buf()]);

            let err = cache.get("broken").unwrap_err();
            assert!(!err.is_not_found());
            assert!(cache.get("broken").is_err());
            assert!(cache.get("fine").unwrap().is_some());
            assert_eq!(cache.parse_count(), 2);
        });
    }

    #[test]
    fn directory_without_index_reports_not_found() {
        with_temp_root(|root| {
            fs::create_dir_all(root.join("bare")).unwrap();
            let cache = ThemeCache::with_roots(vec![root.to_path_buf()]);
            let err = cache.get("bare").unwrap_err();
            assert!(err.is_not_found());
        });
    }

    #[test]
    fn concurrent_first_lookups_build_theme_once() {
        with_temp_root(|root| {
            write_theme(root, "busy", "[Icon Theme]\nInherits=hicolor\n");
            let cache = ThemeCache::with_roots(vec![root.to_path_buf()]);

            let themes: Vec<_> = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|_| scope.spawn(|| cache.get("busy").unwrap().unwrap()))
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            assert_eq!(cache.parse_count(), 1);
            assert!(themes.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        });
    }
}
