use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{SubdirKind, Subdirectory, Theme};

pub const INDEX_FILE: &str = "index.theme";
const THEME_SECTION: &str = "[Icon Theme]";

pub type IndexResult<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("theme index not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read theme index: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid {key} value {value:?} in [{section}] of {path}")]
    InvalidNumber {
        path: PathBuf,
        section: String,
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl IndexError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Declarations read from one `index.theme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeIndex {
    pub parents: Vec<String>,
    pub subdirs: Vec<Subdirectory>,
}

/// Read `<dir>/index.theme` and build the theme named `name`.
pub fn read_theme(name: &str, dir: &Path) -> IndexResult<Theme> {
    let path = dir.join(INDEX_FILE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(IndexError::NotFound { path });
        }
        Err(source) => return Err(IndexError::Read { path, source }),
    };

    let index = parse_index(&path, &contents)?;
    tracing::debug!(
        theme = name,
        path = %path.display(),
        parents = ?index.parents,
        subdirs = index.subdirs.len(),
        "parsed theme index"
    );
    Ok(Theme::new(name, dir, index.parents, index.subdirs))
}

/// Parse index file contents. `path` is only used for error reporting.
pub fn parse_index(path: &Path, contents: &str) -> IndexResult<ThemeIndex> {
    let mut parents = Vec::new();
    let mut directories: Vec<&str> = Vec::new();
    let mut scaled_directories: Vec<&str> = Vec::new();

    for (key, value) in theme_section(contents) {
        match key {
            "Inherits" => parents = split_list(value).map(str::to_string).collect(),
            "Directories" => directories = split_list(value).collect(),
            "ScaledDirectories" => scaled_directories = split_list(value).collect(),
            _ => {}
        }
    }

    let mut relpaths: Vec<&str> = Vec::with_capacity(directories.len() + scaled_directories.len());
    for relpath in directories.into_iter().chain(scaled_directories) {
        if !relpaths.contains(&relpath) {
            relpaths.push(relpath);
        }
    }

    let subdirs = relpaths
        .into_iter()
        .map(|relpath| parse_subdir(path, contents, relpath))
        .collect::<IndexResult<Vec<_>>>()?;

    Ok(ThemeIndex { parents, subdirs })
}

fn parse_subdir(path: &Path, contents: &str, relpath: &str) -> IndexResult<Subdirectory> {
    let mut subdir = Subdirectory::new(relpath);
    let mut min_size = None;
    let mut max_size = None;

    for (key, value) in subdir_section(contents, relpath) {
        match key {
            "Type" => {
                subdir.kind = SubdirKind::from_index_value(value);
                if subdir.kind.is_none() {
                    tracing::debug!(
                        section = relpath,
                        value,
                        "unsupported subdirectory type; size matching disabled"
                    );
                }
            }
            "Size" => subdir.size = parse_number(path, relpath, key, value)?,
            "MinSize" => min_size = Some(parse_number(path, relpath, key, value)?),
            "MaxSize" => max_size = Some(parse_number(path, relpath, key, value)?),
            "Scale" => subdir.scale = parse_number(path, relpath, key, value)?,
            _ => {}
        }
    }

    subdir.min_size = min_size.unwrap_or(subdir.size);
    subdir.max_size = max_size.unwrap_or(subdir.size);
    Ok(subdir)
}

fn parse_number(path: &Path, section: &str, key: &str, value: &str) -> IndexResult<u32> {
    value.parse().map_err(|source| IndexError::InvalidNumber {
        path: path.to_path_buf(),
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        source,
    })
}

/// Entries up to the first section header other than `[Icon Theme]`.
fn theme_section(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with('[') || *line == THEME_SECTION)
        .filter_map(key_value)
}

fn subdir_section<'a>(contents: &'a str, relpath: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
    let header = format!("[{relpath}]");
    contents
        .lines()
        .map(str::trim)
        .skip_while(move |line| *line != header.as_str())
        .skip(1)
        .take_while(|line| !line.starts_with('['))
        .filter_map(key_value)
}

fn key_value(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}
