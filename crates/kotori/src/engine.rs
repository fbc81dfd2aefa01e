//! The configured template engine.
//!
//! An [`Engine`] wraps a MiniJinja [`Environment`] that loads templates
//! through a [`TemplateLoader`] and carries a fixed set of [`Extension`]s.
//! Renderers build their engine once and keep it for their lifetime.

use std::fmt;
use std::sync::Arc;

use minijinja::Environment;

use crate::i18n;
use crate::loader::TemplateLoader;
use crate::options::EngineOptions;

/// Callback that customizes the environment when an engine is built.
///
/// Use it to register filters, functions or tests that options cannot express.
pub type EnvironmentHook = Arc<dyn Fn(&mut Environment<'static>) + Send + Sync>;

/// An optional engine capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Statements evaluated for their effect only (`{% do %}`, `{% set %}`).
    ///
    /// Engine values are immutable, so `{% do items.append(x) %}` fails with an
    /// unknown-method error; build a new list with `{% set %}` instead.
    ExpressionStatements,
    /// `_`, `gettext` and `ngettext` backed by the translation catalog.
    I18n,
    /// `{% break %}` and `{% continue %}` inside loops.
    LoopControls,
    /// `{% autoescape %}` blocks.
    Autoescape,
}

impl Extension {
    /// The Jinja identifier of the extension.
    pub fn name(&self) -> &'static str {
        match self {
            Extension::ExpressionStatements => "do",
            Extension::I18n => "i18n",
            Extension::LoopControls => "loopcontrols",
            Extension::Autoescape => "autoescape",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extensions every engine is built with.
pub const DEFAULT_EXTENSIONS: [Extension; 4] = [
    Extension::ExpressionStatements,
    Extension::I18n,
    Extension::LoopControls,
    Extension::Autoescape,
];

/// A MiniJinja environment wired to a loader.
pub struct Engine {
    env: Environment<'static>,
    loader: Arc<TemplateLoader>,
    extensions: Vec<Extension>,
}

impl Engine {
    /// Builds the environment: loader first, then extensions, options and hooks.
    ///
    /// Hooks run last and in order, so they can override anything the options set.
    pub fn build(
        loader: Arc<TemplateLoader>,
        options: &EngineOptions,
        hooks: &[EnvironmentHook],
    ) -> Self {
        let mut env = Environment::new();

        let source = Arc::clone(&loader);
        env.set_loader(move |name| source.load(name));

        // Statement, loop-control and autoescape syntax is native to the
        // engine; only i18n needs registration.
        i18n::install(&mut env, Arc::new(options.translations.clone()));
        let extensions = DEFAULT_EXTENSIONS.to_vec();

        options.apply(&mut env);

        for hook in hooks {
            hook(&mut env);
        }

        tracing::debug!(
            extensions = ?extensions.iter().map(Extension::name).collect::<Vec<_>>(),
            hooks = hooks.len(),
            "template engine built"
        );

        Self {
            env,
            loader,
            extensions,
        }
    }

    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    pub fn loader(&self) -> &Arc<TemplateLoader> {
        &self.loader
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn has_extension(&self, extension: Extension) -> bool {
        self.extensions.contains(&extension)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("loader", &self.loader)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
