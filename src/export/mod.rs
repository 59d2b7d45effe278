use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

const DEFAULT_RASTERIZER: &str = "inkscape";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported icon format: {path}")]
    UnsupportedFormat { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Copied,
    Rasterized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedIcon {
    pub path: PathBuf,
    pub kind: ExportKind,
}

/// Turns a vector icon into a square raster image.
pub trait Rasterizer {
    fn rasterize(&self, input: &Path, output: &Path, resolution: u32) -> ExportResult<()>;
}

/// Runs `<program> -w N -h N <input> -o <output>`.
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RASTERIZER)
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, input: &Path, output: &Path, resolution: u32) -> ExportResult<()> {
        let resolution = resolution.to_string();
        let status = Command::new(&self.program)
            .args(["-w", &resolution, "-h", &resolution])
            .arg(input)
            .arg("-o")
            .arg(output)
            .status()
            .map_err(|err| ExportError::CommandIo {
                command: self.program.clone(),
                source: err,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExportError::CommandFailed {
                command: self.program.clone(),
                message: format!("command exited with status: {status}"),
            })
        }
    }
}

pub fn materialize(source: &Path, output: &Path, resolution: u32) -> ExportResult<ExportedIcon> {
    materialize_with(&CommandRasterizer::default(), source, output, resolution)
}

/// Copy a raster icon to `output`, or rasterize a vector one into it.
pub fn materialize_with<R: Rasterizer>(
    rasterizer: &R,
    source: &Path,
    output: &Path,
    resolution: u32,
) -> ExportResult<ExportedIcon> {
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let kind = match extension.as_deref() {
        Some("png") => {
            save_overwrite(source, output)?;
            ExportKind::Copied
        }
        Some("svg") => {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            rasterizer.rasterize(source, output, resolution)?;
            ExportKind::Rasterized
        }
        _ => {
            return Err(ExportError::UnsupportedFormat {
                path: source.to_path_buf(),
            })
        }
    };

    tracing::info!(
        source = %source.display(),
        output = %output.display(),
        ?kind,
        "exported icon"
    );
    Ok(ExportedIcon {
        path: output.to_path_buf(),
        kind,
    })
}

fn save_overwrite<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> ExportResult<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let _ = fs::remove_file(destination);
    fs::copy(source, destination)?;
    Ok(())
}
