pub mod config;
pub mod desktop;
pub mod error;
pub mod export;
pub mod logging;
pub mod lookup;
pub mod theme;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use desktop::{DesktopError, DesktopResult};
use export::{materialize, materialize_with, CommandRasterizer, ExportedIcon};

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use lookup::{IconRequest, IconResolver};
pub use theme::{Theme, ThemeCache, FALLBACK_THEME};

/// Theme to search: an explicit name, then `config.json`, then the desktop
/// setting, then hicolor.
pub fn select_theme(explicit: Option<&str>, config: &AppConfig) -> AppResult<String> {
    select_theme_with(explicit, config, desktop::current_icon_theme)
}

fn select_theme_with<F>(
    explicit: Option<&str>,
    config: &AppConfig,
    desktop_theme: F,
) -> AppResult<String>
where
    F: FnOnce() -> DesktopResult<Option<String>>,
{
    if let Some(name) = explicit.or(config.theme.as_deref()) {
        return Ok(name.to_string());
    }
    let desktop = match desktop_theme() {
        Ok(name) => name,
        Err(DesktopError::MissingHomeDirectory) => {
            tracing::debug!("no home directory; skipping desktop icon theme");
            None
        }
        Err(err) => return Err(err.into()),
    };
    Ok(desktop.unwrap_or_else(|| FALLBACK_THEME.to_string()))
}

/// Resolve `request` in `theme` with a resolver built from `config`.
pub fn resolve(theme: &str, request: &IconRequest, config: &AppConfig) -> AppResult<PathBuf> {
    let resolver = IconResolver::new(Arc::new(ThemeCache::from_config(config)));
    resolver
        .find_request(theme, request)
        .ok_or_else(|| AppError::IconNotFound {
            theme: theme.to_string(),
            icon: request.icon.clone(),
            size: request.size,
            scale: request.scale,
        })
}

/// Write the resolved icon to `output` as a `resolution`-pixel PNG, using the
/// rasterizer named in `config` for vector icons.
pub fn export_icon(
    source: &Path,
    output: &Path,
    resolution: u32,
    config: &AppConfig,
) -> AppResult<ExportedIcon> {
    let exported = match config.rasterizer.as_deref() {
        Some(program) => {
            materialize_with(&CommandRasterizer::new(program), source, output, resolution)?
        }
        None => materialize(source, output, resolution)?,
    };
    Ok(exported)
}
