//! Template loading strategies.
//!
//! A renderer resolves its [`Referers`] into exactly one [`TemplateLoader`]:
//!
//! | Referers | Loader | Lookup |
//! |----------|--------|--------|
//! | [`Referers::Directories`] | [`FileSystemLoader`] | directories in order, first hit wins |
//! | [`Referers::Package`] | [`PackageLoader`] | `<package>/<sub_path>/<name>` via [`PackageIndex`] |
//!
//! # Name Resolution
//!
//! Template names use forward slashes (`"mail/welcome.html"`) and must match a
//! file exactly, extension included: `"mail/welcome"` does not find
//! `mail/welcome.jinja`.
//!
//! Names containing `..` segments or backslashes never resolve.

mod filesystem;
mod package;

pub use filesystem::{walk_dir, FileSystemLoader};
pub use package::{PackageIndex, PackageLoader, PackageSource};

use crate::error::SetupError;
use crate::referer::{split_package_path, Referers};

/// The loader a renderer hands to its engine.
#[derive(Debug, Clone)]
pub enum TemplateLoader {
    Filesystem(FileSystemLoader),
    Package(PackageLoader),
}

impl TemplateLoader {
    /// Picks and builds the loader matching the referer variant.
    ///
    /// # Errors
    ///
    /// - [`SetupError::EmptyReferers`] for an empty referer list
    /// - [`SetupError::IncompletePackagePath`] for a package path with one segment
    /// - [`SetupError::PackageNotFound`] / [`SetupError::PackagePathNotFound`]
    ///   when the package index cannot satisfy the path
    pub fn resolve(referers: &Referers, packages: &PackageIndex) -> Result<Self, SetupError> {
        if referers.is_empty() {
            return Err(SetupError::EmptyReferers);
        }

        match referers {
            Referers::Directories(paths) => {
                Ok(TemplateLoader::Filesystem(FileSystemLoader::new(paths.clone())))
            }
            Referers::Package(segments) => {
                let (module, sub_path) = split_package_path(segments)?;
                Ok(TemplateLoader::Package(PackageLoader::new(
                    module, sub_path, packages,
                )?))
            }
        }
    }

    /// Returns the template source for `name`, or `None` if it does not exist.
    ///
    /// This has the signature MiniJinja expects from a loader callback.
    pub fn load(&self, name: &str) -> Result<Option<String>, minijinja::Error> {
        match self {
            TemplateLoader::Filesystem(loader) => loader.load(name),
            TemplateLoader::Package(loader) => loader.load(name),
        }
    }

    /// Lists every template name visible through this loader, sorted and de-duplicated.
    pub fn list_templates(&self) -> Result<Vec<String>, SetupError> {
        match self {
            TemplateLoader::Filesystem(loader) => loader.list_templates(),
            TemplateLoader::Package(loader) => loader.list_templates(),
        }
    }
}

/// Normalizes a template name into a relative, slash-separated path.
///
/// Returns `None` for names that would escape the loader root.
pub(crate) fn normalize_name(name: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in name.split('/') {
        if segment == ".." || segment.contains('\\') {
            return None;
        }
        if segment.is_empty() || segment == "." {
            continue;
        }
        segments.push(segment);
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
