//! Where templates come from.
//!
//! A [`Referers`] value tells the renderer how to find templates: either a list
//! of filesystem directories searched in order, or a dotted package path whose
//! last segment names the template directory inside the package.
//!
//! ```rust
//! use kotori::Referers;
//!
//! // Multiple folders of templates
//! let dirs = Referers::directories(["/opt/app/ui/template", "/usr/local/app/template"]);
//! assert_eq!(dirs.len(), 2);
//!
//! // Module `com.shiroyuki`, templates under `view`
//! let package = Referers::dotted("com.shiroyuki.view");
//! assert_eq!(package.len(), 3);
//! ```

use std::path::PathBuf;

use crate::error::SetupError;

/// The template source configuration of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referers {
    /// Directories searched in order; the first directory holding a template wins.
    Directories(Vec<PathBuf>),

    /// Package path segments: all but the last form the module name, the last
    /// one is the template sub-path inside that module.
    Package(Vec<String>),
}

impl Referers {
    /// Builds a directory-based referer list.
    pub fn directories<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Referers::Directories(paths.into_iter().map(Into::into).collect())
    }

    /// Builds a package-path referer from individual segments.
    pub fn package<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Referers::Package(segments.into_iter().map(Into::into).collect())
    }

    /// Builds a package-path referer from a dotted path such as `app.views`.
    ///
    /// `""` yields an empty referer list. Empty segments elsewhere (`"com..view"`,
    /// `".view"`) are kept, and the path is rejected when the loader is resolved.
    pub fn dotted(path: &str) -> Self {
        if path.is_empty() {
            return Referers::Package(Vec::new());
        }
        Referers::Package(path.split('.').map(str::to_string).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Referers::Directories(paths) => paths.len(),
            Referers::Package(segments) => segments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable form used in log lines and error messages.
    pub fn describe(&self) -> String {
        match self {
            Referers::Directories(paths) => paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            Referers::Package(segments) => segments.join("."),
        }
    }
}

/// Splits package segments into `(module_name, template_sub_path)`.
///
/// `["com", "shiroyuki", "view"]` becomes `("com.shiroyuki", "view")`.
///
/// # Errors
///
/// Returns [`SetupError::IncompletePackagePath`] when fewer than two segments
/// are given or any segment is empty.
pub fn split_package_path(segments: &[String]) -> Result<(String, String), SetupError> {
    let incomplete = || SetupError::IncompletePackagePath {
        path: segments.join("."),
    };

    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(incomplete());
    }
    match segments.split_last() {
        Some((sub_path, module)) if !module.is_empty() => {
            Ok((module.join("."), sub_path.clone()))
        }
        _ => Err(incomplete()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_package_path() {
        let (module, sub_path) = split_package_path(&strings(&["com", "shiroyuki", "view"])).unwrap();
        assert_eq!(module, "com.shiroyuki");
        assert_eq!(sub_path, "view");
    }

    #[test]
    fn test_split_package_path_two_segments() {
        let (module, sub_path) = split_package_path(&strings(&["app", "templates"])).unwrap();
        assert_eq!(module, "app");
        assert_eq!(sub_path, "templates");
    }

    #[test]
    fn test_split_package_path_single_segment_fails() {
        let result = split_package_path(&strings(&["onlyone"]));
        match result {
            Err(SetupError::IncompletePackagePath { path }) => assert_eq!(path, "onlyone"),
            other => panic!("expected IncompletePackagePath, got {:?}", other),
        }
    }

    #[test]
    fn test_split_package_path_empty_fails() {
        assert!(split_package_path(&[]).is_err());
    }

    #[test]
    fn test_dotted() {
        assert_eq!(
            Referers::dotted("app.views"),
            Referers::Package(strings(&["app", "views"]))
        );
        assert!(Referers::dotted("").is_empty());
        assert_eq!(
            Referers::dotted("com..view"),
            Referers::Package(strings(&["com", "", "view"]))
        );
    }

    #[test]
    fn test_split_package_path_rejects_empty_segments() {
        for path in ["com..view", ".view", "com.view.", "."] {
            let Referers::Package(segments) = Referers::dotted(path) else {
                unreachable!()
            };
            match split_package_path(&segments) {
                Err(SetupError::IncompletePackagePath { path: reported }) => assert_eq!(reported, path),
                other => panic!("expected IncompletePackagePath for {:?}, got {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(Referers::dotted("com.shiroyuki.view").describe(), "com.shiroyuki.view");
        assert_eq!(Referers::directories(["a", "b"]).describe(), "a, b");
    }

    proptest! {
        #[test]
        fn prop_split_uses_all_but_last_segment(
            segments in proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 2..6)
        ) {
            let (module, sub_path) = split_package_path(&segments).unwrap();
            prop_assert_eq!(module, segments[..segments.len() - 1].join("."));
            prop_assert_eq!(&sub_path, segments.last().unwrap());
        }
    }
}
