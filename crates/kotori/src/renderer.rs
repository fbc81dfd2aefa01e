//! The template renderer.
//!
//! [`Renderer`] turns a [`Referers`] configuration into a working engine and
//! renders templates by path:
//!
//! ```rust,ignore
//! use kotori::{context, Referers, Renderer};
//!
//! let renderer = Renderer::new(Referers::directories(["/opt/app/ui/template"]))?;
//! let output = renderer.render("dummy.html", context! { appname => "ikayaki", version => 1.0 })?;
//! ```
//!
//! # Lifecycle
//!
//! Construction only stores configuration. The loader is resolved the first
//! time it is needed, and the engine is built right after it; both are kept
//! for the renderer's lifetime. Initialization is thread-safe: concurrent first
//! renders still build exactly one loader and one engine.

use std::sync::Arc;

use minijinja::Environment;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::engine::{Engine, EnvironmentHook};
use crate::error::{RenderError, SetupError};
use crate::loader::{PackageIndex, TemplateLoader};
use crate::options::EngineOptions;
use crate::referer::Referers;

/// Renders templates found through a loader built from referers.
///
/// # Example
///
/// ```rust,ignore
/// use kotori::{EngineOptions, PackageIndex, Referers, Renderer, UndefinedMode};
///
/// let renderer = Renderer::builder(Referers::dotted("com.shiroyuki.view"))
///     .packages(PackageIndex::new().with_search_root("./resources"))
///     .options(EngineOptions::default().undefined(UndefinedMode::Strict))
///     .configure(|env| env.add_filter("shout", |s: String| s.to_uppercase()))
///     .build()?;
/// ```
pub struct Renderer {
    referers: Referers,
    options: EngineOptions,
    packages: PackageIndex,
    hooks: Vec<EnvironmentHook>,
    loader: OnceCell<Arc<TemplateLoader>>,
    engine: OnceCell<Engine>,
}

impl Renderer {
    /// Creates a renderer with default options and an empty package index.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::EmptyReferers`] if `referers` is empty.
    pub fn new(referers: Referers) -> Result<Self, SetupError> {
        Self::builder(referers).build()
    }

    /// Starts configuring a renderer.
    pub fn builder(referers: Referers) -> RendererBuilder {
        RendererBuilder {
            referers,
            options: EngineOptions::default(),
            packages: PackageIndex::default(),
            hooks: Vec::new(),
        }
    }

    pub fn referers(&self) -> &Referers {
        &self.referers
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Returns the loader, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if the referers cannot be turned into a loader
    /// (package path too short, unknown package, missing sub-path).
    pub fn loader(&self) -> Result<&Arc<TemplateLoader>, SetupError> {
        self.loader.get_or_try_init(|| {
            let loader = TemplateLoader::resolve(&self.referers, &self.packages)?;
            tracing::debug!(referers = %self.referers.describe(), "template loader resolved");
            Ok(Arc::new(loader))
        })
    }

    /// Returns the engine, building it (and the loader) on first use.
    pub fn engine(&self) -> Result<&Engine, SetupError> {
        self.engine.get_or_try_init(|| {
            let loader = Arc::clone(self.loader()?);
            Ok(Engine::build(loader, &self.options, &self.hooks))
        })
    }

    /// Renders the template at `template_path` with `context` as its variables.
    ///
    /// `context` can be anything serializable; [`context!`](crate::context)
    /// is the usual way to build it inline.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Setup`] if the loader cannot be resolved
    /// - [`RenderError::TemplateNotFound`] if the loader has no such template
    /// - [`RenderError::Syntax`] if the template is malformed
    /// - [`RenderError::Engine`] for failures while rendering
    pub fn render<S: Serialize>(&self, template_path: &str, context: S) -> Result<String, RenderError> {
        let engine = self.engine()?;
        let template = engine.environment().get_template(template_path)?;
        tracing::trace!(template = template_path, "rendering template");
        Ok(template.render(context)?)
    }

    /// Renders an inline template string with the same engine configuration.
    pub fn render_str<S: Serialize>(&self, source: &str, context: S) -> Result<String, RenderError> {
        let engine = self.engine()?;
        Ok(engine.environment().render_str(source, context)?)
    }

    /// Checks whether `name` resolves to a template that compiles.
    pub fn has_template(&self, name: &str) -> bool {
        self.engine()
            .is_ok_and(|engine| engine.environment().get_template(name).is_ok())
    }

    /// Lists the templates visible through the loader.
    pub fn list_templates(&self) -> Result<Vec<String>, SetupError> {
        self.loader()?.list_templates()
    }

    /// Drops the engine and its compiled templates.
    ///
    /// The next render builds a fresh engine, so template files are read again.
    /// The resolved loader is kept.
    pub fn refresh(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!("template engine dropped for refresh");
        }
    }
}

/// Builder for [`Renderer`].
pub struct RendererBuilder {
    referers: Referers,
    options: EngineOptions,
    packages: PackageIndex,
    hooks: Vec<EnvironmentHook>,
}

impl RendererBuilder {
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets where package-path referers look for modules.
    pub fn packages(mut self, packages: PackageIndex) -> Self {
        self.packages = packages;
        self
    }

    /// Adds a hook that customizes the environment when the engine is built.
    ///
    /// Hooks run once per engine, after the options are applied.
    pub fn configure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Environment<'static>) + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Finishes the renderer. No loader or engine is built yet.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::EmptyReferers`] if the referers are empty.
    pub fn build(self) -> Result<Renderer, SetupError> {
        if self.referers.is_empty() {
            return Err(SetupError::EmptyReferers);
        }

        Ok(Renderer {
            referers: self.referers,
            options: self.options,
            packages: self.packages,
            hooks: self.hooks,
            loader: OnceCell::new(),
            engine: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn create_template_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
    }

    #[test]
    fn test_renderer_renders_dummy_template() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "dummy.html", "{{ appname }} v{{ version }}");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        let output = renderer
            .render("dummy.html", context! { appname => "ikayaki", version => 1.0 })
            .unwrap();
        assert_eq!(output, "ikayaki v1.0");
    }

    #[test]
    fn test_renderer_rejects_empty_directories() {
        let result = Renderer::new(Referers::Directories(vec![]));
        assert!(matches!(result, Err(SetupError::EmptyReferers)));
    }

    #[test]
    fn test_renderer_rejects_empty_package_path() {
        let result = Renderer::new(Referers::Package(vec![]));
        assert!(matches!(result, Err(SetupError::EmptyReferers)));
    }

    #[test]
    fn test_single_segment_package_fails_at_loader_resolution() {
        // Construction succeeds; the path is only split when the loader is needed.
        let renderer = Renderer::new(Referers::package(["onlyone"])).unwrap();

        assert!(matches!(
            renderer.loader(),
            Err(SetupError::IncompletePackagePath { .. })
        ));
        let err = renderer.render("dummy.html", context! {}).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Setup(SetupError::IncompletePackagePath { .. })
        ));
    }

    #[test]
    fn test_construction_is_lazy() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();

        assert!(renderer.loader.get().is_none());
        assert!(renderer.engine.get().is_none());

        renderer.engine().unwrap();
        assert!(renderer.loader.get().is_some());
        assert!(renderer.engine.get().is_some());
    }

    #[test]
    fn test_engine_and_loader_built_once() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "a.txt", "A{{ n }}");

        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let renderer = Renderer::builder(Referers::directories([dir.path()]))
            .configure(move |_env| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let first_loader = Arc::clone(renderer.loader().unwrap());
        for n in 0..3 {
            assert_eq!(renderer.render("a.txt", context! { n }).unwrap(), format!("A{}", n));
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first_loader, renderer.loader().unwrap()));
        assert!(Arc::ptr_eq(&first_loader, renderer.engine().unwrap().loader()));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();

        let err = renderer.render("missing.html", context! {}).unwrap_err();
        assert!(err.is_template_not_found(), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_suffixed_file_does_not_match_bare_name() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "page.txt", "found");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        let err = renderer.render("page", context! {}).unwrap_err();
        assert!(err.is_template_not_found(), "unexpected error: {:?}", err);
        assert_eq!(renderer.render("page.txt", context! {}).unwrap(), "found");
    }

    #[test]
    fn test_syntax_error_surfaces() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "broken.html", "{{ unclosed");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        let err = renderer.render("broken.html", context! {}).unwrap_err();
        assert!(matches!(err, RenderError::Syntax(_)), "unexpected error: {:?}", err);
        assert_eq!(err.kind(), Some(minijinja::ErrorKind::SyntaxError));
    }

    #[test]
    fn test_render_str_uses_engine_configuration() {
        let dir = TempDir::new().unwrap();
        let renderer = Renderer::builder(Referers::directories([dir.path()]))
            .options(EngineOptions::default().global("site", "Ikayaki"))
            .build()
            .unwrap();

        let output = renderer
            .render_str("{{ site }}: {{ gettext('ok') }}", context! {})
            .unwrap();
        assert_eq!(output, "Ikayaki: ok");
    }

    #[test]
    fn test_includes_resolve_through_loader() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "_partial.html", "PARTIAL");
        create_template_file(dir.path(), "page.html", "Before {% include '_partial.html' %} After");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        assert_eq!(
            renderer.render("page.html", context! {}).unwrap(),
            "Before PARTIAL After"
        );
    }

    #[test]
    fn test_has_template() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "index.html", "index");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        assert!(renderer.has_template("index.html"));
        assert!(renderer.has_template("index.html"));
        assert!(!renderer.has_template("other.html"));
    }

    #[test]
    fn test_has_template_with_unresolvable_loader() {
        let renderer = Renderer::new(Referers::package(["onlyone"])).unwrap();
        assert!(!renderer.has_template("index.html"));
    }

    #[test]
    fn test_list_templates() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "index.html", "");
        create_template_file(dir.path(), "mail/welcome.txt", "");

        let renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        assert_eq!(
            renderer.list_templates().unwrap(),
            vec!["index.html", "mail/welcome.txt"]
        );
    }

    #[test]
    fn test_refresh_rereads_templates() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "hot.txt", "Version 1");

        let mut renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();
        assert_eq!(renderer.render("hot.txt", context! {}).unwrap(), "Version 1");

        create_template_file(dir.path(), "hot.txt", "Version 2");
        renderer.refresh();
        assert_eq!(renderer.render("hot.txt", context! {}).unwrap(), "Version 2");
    }

    #[test]
    fn test_refresh_keeps_loader() {
        let dir = TempDir::new().unwrap();
        let mut renderer = Renderer::new(Referers::directories([dir.path()])).unwrap();

        let loader = Arc::clone(renderer.loader().unwrap());
        renderer.engine().unwrap();
        renderer.refresh();

        assert!(renderer.engine.get().is_none());
        assert!(Arc::ptr_eq(&loader, renderer.loader().unwrap()));
    }

    #[test]
    fn test_renderer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Renderer>();
    }
}
