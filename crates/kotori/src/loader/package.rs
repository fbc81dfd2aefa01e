//! Package-resource template loading.
//!
//! A package path such as `com.shiroyuki.view` names a module (`com.shiroyuki`)
//! and a template directory inside it (`view`). The [`PackageIndex`] decides
//! where a module's resources live:
//!
//! 1. Modules registered explicitly, either as a directory or as an
//!    [`EmbeddedPackage`]
//! 2. Search roots, in order: module `a.b` maps to `<root>/a/b`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::filesystem::{read_template, walk_dir};
use super::normalize_name;
use crate::embedded::EmbeddedPackage;
use crate::error::SetupError;

/// Where a module's resources are stored.
#[derive(Debug, Clone)]
pub enum PackageSource {
    Directory(PathBuf),
    Embedded(EmbeddedPackage),
}

/// Maps dotted module names to their resources.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    modules: HashMap<String, PackageSource>,
    search_roots: Vec<PathBuf>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module whose resources live in `path`.
    pub fn with_directory(mut self, module: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.modules
            .insert(module.into(), PackageSource::Directory(path.into()));
        self
    }

    /// Registers a module whose resources were embedded at compile time.
    pub fn with_embedded(mut self, module: impl Into<String>, package: EmbeddedPackage) -> Self {
        self.modules
            .insert(module.into(), PackageSource::Embedded(package));
        self
    }

    /// Adds a root directory under which unregistered modules are looked up.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    /// Finds the resources for `module`, or `None` if no source knows it.
    pub fn resolve(&self, module: &str) -> Option<PackageSource> {
        if let Some(source) = self.modules.get(module) {
            return Some(source.clone());
        }

        let relative: PathBuf = module.split('.').collect();
        self.search_roots
            .iter()
            .map(|root| root.join(&relative))
            .find(|dir| dir.is_dir())
            .map(PackageSource::Directory)
    }
}

#[derive(Debug, Clone)]
enum PackageContents {
    Directory(PathBuf),
    Embedded(HashMap<String, &'static str>),
}

/// Loads templates from the sub-path of a package.
#[derive(Debug, Clone)]
pub struct PackageLoader {
    module: String,
    sub_path: String,
    contents: PackageContents,
}

impl PackageLoader {
    /// Builds a loader for `<module>/<sub_path>`.
    ///
    /// # Errors
    ///
    /// - [`SetupError::PackageNotFound`] if the index cannot resolve `module`
    /// - [`SetupError::PackagePathNotFound`] if the package has nothing under `sub_path`
    pub fn new(
        module: impl Into<String>,
        sub_path: impl Into<String>,
        index: &PackageIndex,
    ) -> Result<Self, SetupError> {
        let module = module.into();
        let sub_path = sub_path.into();

        let source = index
            .resolve(&module)
            .ok_or_else(|| SetupError::PackageNotFound {
                module: module.clone(),
            })?;

        let contents = match source {
            PackageSource::Embedded(package) if !package.should_hot_reload() => {
                PackageContents::Embedded(package.templates_under(&sub_path))
            }
            PackageSource::Embedded(package) => {
                PackageContents::Directory(package.source_dir().join(&sub_path))
            }
            PackageSource::Directory(root) => PackageContents::Directory(root.join(&sub_path)),
        };

        let present = match &contents {
            PackageContents::Directory(dir) => dir.is_dir(),
            PackageContents::Embedded(templates) => !templates.is_empty(),
        };
        if !present {
            return Err(SetupError::PackagePathNotFound { module, sub_path });
        }

        Ok(Self {
            module,
            sub_path,
            contents,
        })
    }

    /// The dotted module name, e.g. `com.shiroyuki`.
    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// The template directory inside the module, e.g. `view`.
    pub fn template_sub_path(&self) -> &str {
        &self.sub_path
    }

    /// The on-disk template directory, if templates are read from disk.
    pub fn directory(&self) -> Option<&Path> {
        match &self.contents {
            PackageContents::Directory(dir) => Some(dir),
            PackageContents::Embedded(_) => None,
        }
    }

    pub fn load(&self, name: &str) -> Result<Option<String>, minijinja::Error> {
        let Some(relative) = normalize_name(name) else {
            return Ok(None);
        };

        match &self.contents {
            PackageContents::Directory(dir) => {
                let path = dir.join(&relative);
                if path.is_file() {
                    read_template(&path).map(Some)
                } else {
                    Ok(None)
                }
            }
            PackageContents::Embedded(templates) => {
                Ok(templates.get(&relative).map(|content| (*content).to_string()))
            }
        }
    }

    pub fn list_templates(&self) -> Result<Vec<String>, SetupError> {
        let mut names = match &self.contents {
            PackageContents::Directory(dir) => walk_dir(dir)?,
            PackageContents::Embedded(templates) => templates.keys().cloned().collect(),
        };
        names.sort();
        Ok(names)
    }
}
