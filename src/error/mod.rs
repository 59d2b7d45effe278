use crate::desktop::DesktopError;
use crate::export::ExportError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Desktop(#[from] DesktopError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("icon not found: {icon} (theme {theme}, size {size}@{scale})")]
    IconNotFound {
        theme: String,
        icon: String,
        size: u32,
        scale: u32,
    },
}
