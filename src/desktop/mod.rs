//! Reads the desktop's active icon theme name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{config_env_dirs, config_root, ConfigPathError};

const KDEGLOBALS_FILE: &str = "kdeglobals";
const ICONS_SECTION: &str = "[Icons]";
const THEME_KEY: &str = "Theme";

pub type DesktopResult<T> = std::result::Result<T, DesktopError>;

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read desktop config: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Icon theme configured in `kdeglobals`, or `None` if the file or key is absent.
pub fn current_icon_theme() -> DesktopResult<Option<String>> {
    let (xdg_config_home, home) = config_env_dirs();
    current_icon_theme_with(xdg_config_home.as_deref(), home.as_deref())
}

fn current_icon_theme_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> DesktopResult<Option<String>> {
    let path = config_root(xdg_config_home, home)
        .map_err(|error| match error {
            ConfigPathError::MissingHomeDirectory => DesktopError::MissingHomeDirectory,
        })?
        .join(KDEGLOBALS_FILE);

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(DesktopError::Read { path, source }),
    };

    let theme = parse_kdeglobals_theme(&contents);
    tracing::debug!(path = %path.display(), ?theme, "read desktop icon theme");
    Ok(theme)
}

/// `Theme` entry of the `[Icons]` section.
pub fn parse_kdeglobals_theme(contents: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .skip_while(|line| *line != ICONS_SECTION)
        .skip(1)
        .take_while(|line| !line.starts_with('['))
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == THEME_KEY)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
