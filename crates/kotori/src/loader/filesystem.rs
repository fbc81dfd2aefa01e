//! Directory-based template loading.

use std::path::{Path, PathBuf};

use minijinja::ErrorKind;

use super::normalize_name;
use crate::error::SetupError;

/// Loads templates from a list of directories, searched in order.
///
/// Directories that do not exist are not an error; they simply never match.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    search_path: Vec<PathBuf>,
}

impl FileSystemLoader {
    pub fn new<I, P>(search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let search_path: Vec<PathBuf> = search_path.into_iter().map(Into::into).collect();
        for dir in &search_path {
            if !dir.is_dir() {
                tracing::warn!(path = %dir.display(), "template directory does not exist");
            }
        }
        Self { search_path }
    }

    /// The directories searched, in lookup order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn load(&self, name: &str) -> Result<Option<String>, minijinja::Error> {
        let Some(relative) = normalize_name(name) else {
            return Ok(None);
        };

        for dir in &self.search_path {
            let path = dir.join(&relative);
            if path.is_file() {
                tracing::trace!(template = name, path = %path.display(), "loading template");
                return read_template(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn list_templates(&self) -> Result<Vec<String>, SetupError> {
        let mut names = Vec::new();
        for dir in self.search_path.iter().filter(|dir| dir.is_dir()) {
            names.extend(walk_dir(dir)?);
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// Reads a template file, reporting failures as engine errors.
pub(crate) fn read_template(path: &Path) -> Result<String, minijinja::Error> {
    std::fs::read_to_string(path).map_err(|err| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("could not read template {}", path.display()),
        )
        .with_source(err)
    })
}

/// Walks a directory recursively and returns the slash-separated path of every
/// file relative to `root`.
///
/// # Errors
///
/// Returns [`SetupError::Io`] if a directory cannot be read.
pub fn walk_dir(root: &Path) -> Result<Vec<String>, SetupError> {
    let mut names = Vec::new();
    walk_dir_recursive(root, root, &mut names)?;
    names.sort();
    Ok(names)
}

fn walk_dir_recursive(current: &Path, root: &Path, names: &mut Vec<String>) -> Result<(), SetupError> {
    let io_error = |source: std::io::Error| SetupError::Io {
        path: current.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(current).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();

        // Symlinked directories are not followed, so link cycles cannot recurse forever.
        if entry.file_type().map_err(io_error)?.is_symlink() && path.is_dir() {
            continue;
        }

        if path.is_dir() {
            walk_dir_recursive(&path, root, names)?;
        } else if path.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                names.push(
                    relative
                        .to_string_lossy()
                        .replace(std::path::MAIN_SEPARATOR, "/"),
                );
            }
        }
    }

    Ok(())
}
