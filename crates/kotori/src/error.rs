//! Error types for renderer setup and rendering.
//!
//! Two error types cover the whole crate:
//!
//! - [`SetupError`]: the referer configuration cannot be turned into a loader
//!   (empty referers, incomplete package path, unknown package) or the engine
//!   options cannot be read.
//! - [`RenderError`]: anything that goes wrong while fetching or rendering a
//!   template. Engine failures keep the original [`minijinja::Error`] as their
//!   source so callers see exactly what the engine reported.

use std::path::PathBuf;

use minijinja::ErrorKind;

/// Error raised while configuring a [`Renderer`](crate::Renderer).
///
/// Setup errors are fatal for the renderer that produced them: the caller has
/// to build a new renderer with valid referers.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// No directories or package segments were given.
    #[error("require either one resource module or multiple file paths to the templates")]
    EmptyReferers,

    /// A package path needs at least a module segment and a template sub-path.
    #[error("could not instantiate the package loader ({path})")]
    IncompletePackagePath { path: String },

    /// The module part of a package path is not known to the package index.
    #[error("package not found: {module}")]
    PackageNotFound { module: String },

    /// The package exists but has no resources under the template sub-path.
    #[error("package '{module}' has no template path '{sub_path}'")]
    PackagePathNotFound { module: String, sub_path: String },

    /// Engine options could not be parsed.
    #[error("invalid engine options: {0}")]
    InvalidOptions(String),

    /// Reading a configuration file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for SetupError {
    fn from(err: serde_yaml::Error) -> Self {
        SetupError::InvalidOptions(err.to_string())
    }
}

/// Error raised by [`Renderer::render`](crate::Renderer::render).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer could not resolve its loader.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// The active loader has no template under the requested path.
    #[error("template not found: {0}")]
    TemplateNotFound(#[source] minijinja::Error),

    /// The template source is malformed.
    #[error("template syntax error: {0}")]
    Syntax(#[source] minijinja::Error),

    /// Any other failure reported by the engine while rendering.
    #[error("template error: {0}")]
    Engine(#[source] minijinja::Error),
}

impl RenderError {
    /// Returns the engine error kind, or `None` for setup failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.engine_error().map(|err| err.kind())
    }

    /// Returns the underlying engine error, if this error came from the engine.
    pub fn engine_error(&self) -> Option<&minijinja::Error> {
        match self {
            RenderError::Setup(_) => None,
            RenderError::TemplateNotFound(err)
            | RenderError::Syntax(err)
            | RenderError::Engine(err) => Some(err),
        }
    }

    pub fn is_template_not_found(&self) -> bool {
        matches!(self, RenderError::TemplateNotFound(_))
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err),
            ErrorKind::SyntaxError | ErrorKind::BadEscape => RenderError::Syntax(err),
            _ => RenderError::Engine(err),
        }
    }
}
