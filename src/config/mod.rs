use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "iconpath";
const APP_CONFIG_FILE: &str = "config.json";
const SYSTEM_ICON_ROOT: &str = "/usr/share/icons";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Icon theme to use instead of the desktop's current one.
    #[serde(default)]
    pub theme: Option<String>,
    /// Replaces the default icon search roots, in priority order.
    #[serde(default)]
    pub icon_roots: Option<Vec<PathBuf>>,
    /// Program used to rasterize vector icons.
    #[serde(default)]
    pub rasterizer: Option<String>,
}

impl AppConfig {
    pub fn search_roots(&self) -> Vec<PathBuf> {
        match &self.icon_roots {
            Some(roots) if !roots.is_empty() => roots.clone(),
            _ => default_search_roots(),
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let Ok(path) = config_file_path(xdg_config_home, home) else {
        return AppConfig::default();
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppConfig::default(),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            return AppConfig::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
        AppConfig::default()
    })
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// `<config root>/iconpath/config.json`.
fn config_file_path(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    Ok(config_root(xdg_config_home, home)?
        .join(APP_DIR)
        .join(APP_CONFIG_FILE))
}

pub(crate) fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

/// User-local icon directory first, then the system-wide one.
pub fn default_search_roots() -> Vec<PathBuf> {
    let xdg_data_home = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    default_search_roots_with(xdg_data_home.as_deref(), home.as_deref())
}

fn default_search_roots_with(xdg_data_home: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(2);
    if let Some(xdg) = xdg_data_home.filter(|path| !path.as_os_str().is_empty()) {
        roots.push(xdg.join("icons"));
    } else if let Some(home) = home {
        roots.push(home.join(".local/share/icons"));
    }
    roots.push(PathBuf::from(SYSTEM_ICON_ROOT));
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("iconpath-config-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn config_file_path_prefers_xdg_config_home() {
        let path = config_file_path(
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/iconpath/config.json"));
    }

    #[test]
    fn config_file_path_falls_back_to_home_dot_config() {
        let path = config_file_path(Some(Path::new("")), Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/iconpath/config.json"));
    }

    #[test]
    fn config_root_errors_when_home_missing_and_xdg_unset() {
        let error = config_root(None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn search_roots_put_user_directory_before_system() {
        let roots = default_search_roots_with(None, Some(Path::new("/home/test")));
        assert_eq!(
            roots,
            vec![
                PathBuf::from("/home/test/.local/share/icons"),
                PathBuf::from("/usr/share/icons"),
            ]
        );

        let roots = default_search_roots_with(Some(Path::new("/data")), Some(Path::new("/home/test")));
        assert_eq!(roots[0], PathBuf::from("/data/icons"));
    }

    #[test]
    fn search_roots_without_home_keep_system_directory() {
        let roots = default_search_roots_with(None, None);
        assert_eq!(roots, vec![PathBuf::from("/usr/share/icons")]);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        with_temp_root(|root| {
            let config = load_app_config_with(Some(root), None);
            assert!(config.theme.is_none());
            assert!(config.icon_roots.is_none());
            assert!(config.rasterizer.is_none());
        });
    }

    #[test]
    fn config_file_overrides_theme_and_roots() {
        with_temp_root(|root| {
            let dir = root.join(APP_DIR);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join(APP_CONFIG_FILE),
                r#"{ "theme": "Papirus", "icon_roots": ["/opt/icons"], "rasterizer": "rsvg-convert" }"#,
            )
            .unwrap();

            let config = load_app_config_with(Some(root), None);
            assert_eq!(config.theme.as_deref(), Some("Papirus"));
            assert_eq!(config.search_roots(), vec![PathBuf::from("/opt/icons")]);
            assert_eq!(config.rasterizer.as_deref(), Some("rsvg-convert"));
        });
    }

    #[test]
    fn invalid_config_file_falls_back_to_defaults() {
        with_temp_root(|root| {
            let dir = root.join(APP_DIR);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(APP_CONFIG_FILE), "{ invalid ").unwrap();

            let config = load_app_config_with(Some(root), None);
            assert!(config.theme.is_none());
        });
    }
}
