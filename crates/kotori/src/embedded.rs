//! Package resources embedded at compile time.
//!
//! [`EmbeddedPackage`] is what `embed_package!` produces: every file under a
//! directory, baked into the binary as `(relative_path, content)` pairs, plus
//! the directory the files came from.
//!
//! - **Release builds**: the embedded content is used, no file I/O.
//! - **Debug builds**: if the source directory still exists, templates are
//!   read from disk instead so edits show up without recompiling.
//!
//! ```rust,ignore
//! use kotori::{embed_package, PackageIndex, Referers, Renderer};
//!
//! let packages = PackageIndex::new().with_embedded("com.shiroyuki", embed_package!("src/resources"));
//! let renderer = Renderer::builder(Referers::dotted("com.shiroyuki.view"))
//!     .packages(packages)
//!     .build()?;
//! ```

use std::collections::HashMap;
use std::path::Path;

/// Resources of one package, embedded with optional debug hot-reload.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedPackage {
    entries: &'static [(&'static str, &'static str)],
    source_path: &'static str,
}

impl EmbeddedPackage {
    /// Creates an embedded package.
    ///
    /// Normally called by the `embed_package!` macro.
    #[doc(hidden)]
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        source_path: &'static str,
    ) -> Self {
        Self {
            entries,
            source_path,
        }
    }

    /// The embedded `(relative_path, content)` pairs, paths slash-separated.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// The directory the entries were read from at compile time.
    pub fn source_path(&self) -> &'static str {
        self.source_path
    }

    pub fn source_dir(&self) -> &Path {
        Path::new(self.source_path)
    }

    /// True in debug builds when the source directory still exists on disk.
    pub fn should_hot_reload(&self) -> bool {
        cfg!(debug_assertions) && self.source_dir().is_dir()
    }

    /// Returns the entries below `sub_path`, keyed by their path relative to it.
    pub fn templates_under(&self, sub_path: &str) -> HashMap<String, &'static str> {
        let prefix = format!("{}/", sub_path.trim_matches('/'));
        self.entries
            .iter()
            .filter_map(|(name, content)| {
                name.strip_prefix(prefix.as_str())
                    .map(|relative| (relative.to_string(), *content))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ENTRIES: &[(&str, &str)] = &[
        ("view/dummy.html", "{{ appname }} v{{ version }}"),
        ("view/mail/welcome.txt", "Welcome"),
        ("static/app.css", "body {}"),
    ];

    #[test]
    fn test_embedded_package_new() {
        let package = EmbeddedPackage::new(ENTRIES, "src/resources");
        assert_eq!(package.entries().len(), 3);
        assert_eq!(package.source_path(), "src/resources");
    }

    #[test]
    fn test_should_hot_reload_nonexistent_path() {
        let package = EmbeddedPackage::new(ENTRIES, "/nonexistent/kotori/path");
        assert!(!package.should_hot_reload());
    }

    #[test]
    fn test_templates_under() {
        let package = EmbeddedPackage::new(ENTRIES, "/nonexistent");
        let templates = package.templates_under("view");

        assert_eq!(templates.len(), 2);
        assert_eq!(templates.get("dummy.html"), Some(&"{{ appname }} v{{ version }}"));
        assert_eq!(templates.get("mail/welcome.txt"), Some(&"Welcome"));
        assert!(!templates.contains_key("app.css"));
    }

    #[test]
    fn test_templates_under_missing_sub_path() {
        let package = EmbeddedPackage::new(ENTRIES, "/nonexistent");
        assert!(package.templates_under("templates").is_empty());
    }
}
