//! # Kotori - Jinja Templates from Directories or Packages
//!
//! `kotori` wraps the MiniJinja engine behind a single [`Renderer`]. A renderer
//! is configured with [`Referers`] that say where templates live, and renders
//! templates by path with any serializable context.
//!
//! ## Core Concepts
//!
//! - [`Referers`]: a list of directories, or a dotted package path
//! - [`Renderer`]: resolves a loader and an engine lazily, then renders
//! - [`PackageIndex`]: maps package modules to directories or embedded resources
//! - [`EngineOptions`]: autoescape, undefined handling, whitespace, globals, translations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kotori::{context, Referers, Renderer};
//!
//! let renderer = Renderer::new(Referers::directories([
//!     "/opt/app/ui/template",
//!     "/usr/local/app/template",
//! ]))?;
//!
//! let output = renderer.render("dummy.html", context! { appname => "ikayaki", version => 1.0 })?;
//! assert_eq!(output, "ikayaki v1.0");
//! ```
//!
//! ## Package Paths
//!
//! A dotted path splits into a module and a template directory:
//! `com.shiroyuki.view` loads from the `view` directory of module
//! `com.shiroyuki`. Modules are found through the [`PackageIndex`], either
//! registered explicitly or looked up under search roots:
//!
//! ```rust,ignore
//! use kotori::{PackageIndex, Referers, Renderer};
//!
//! let renderer = Renderer::builder(Referers::dotted("com.shiroyuki.view"))
//!     .packages(PackageIndex::new().with_search_root("resources"))
//!     .build()?;
//! ```
//!
//! With the `macros` feature, package resources can be compiled into the binary
//! using `embed_package!` and registered with [`PackageIndex::with_embedded`].
//!
//! ## Engine Extensions
//!
//! Every engine is built with the same [`DEFAULT_EXTENSIONS`]: expression
//! statements, i18n (`_`, `gettext`, `ngettext`), loop controls
//! (`{% break %}`, `{% continue %}`) and `{% autoescape %}` blocks.

mod embedded;
mod engine;
mod error;
mod i18n;
pub mod loader;
mod options;
pub mod prelude;
mod referer;
mod renderer;

pub use embedded::EmbeddedPackage;
pub use engine::{Engine, EnvironmentHook, Extension, DEFAULT_EXTENSIONS};
pub use error::{RenderError, SetupError};
pub use i18n::Catalog;
pub use loader::{
    walk_dir, FileSystemLoader, PackageIndex, PackageLoader, PackageSource, TemplateLoader,
};
pub use options::{AutoescapeMode, EngineOptions, UndefinedMode};
pub use referer::{split_package_path, Referers};
pub use renderer::{Renderer, RendererBuilder};

// Re-export the engine so hooks and contexts don't need a separate dependency
pub use minijinja;
pub use minijinja::context;

#[cfg(feature = "macros")]
pub use kotori_macros::embed_package;
