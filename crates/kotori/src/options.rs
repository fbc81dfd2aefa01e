//! Engine configuration.
//!
//! [`EngineOptions`] enumerates the engine settings a renderer may change.
//! Options can be built in code or read from YAML:
//!
//! ```rust
//! use kotori::{AutoescapeMode, EngineOptions, UndefinedMode};
//!
//! let options = EngineOptions::from_yaml(r#"
//! autoescape: by_extension
//! undefined: strict
//! trim_blocks: true
//! globals:
//!   site: Ikayaki
//! translations:
//!   Hello: Bonjour
//! "#).unwrap();
//!
//! assert_eq!(options.autoescape, AutoescapeMode::ByExtension);
//! assert_eq!(options.undefined, UndefinedMode::Strict);
//! assert!(options.trim_blocks);
//! ```
//!
//! Every field has a default, so an empty document is valid.

use std::collections::BTreeMap;
use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::i18n::Catalog;

/// Default autoescape policy for templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoescapeMode {
    /// No escaping unless a template opts in with `{% autoescape true %}`.
    #[default]
    None,
    /// HTML-escape every template.
    Html,
    /// HTML-escape templates whose name ends in one of `autoescape_extensions`.
    ByExtension,
}

/// What happens when a template reads an undefined variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedMode {
    /// Undefined values render as empty strings.
    #[default]
    Lenient,
    /// Any use of an undefined value is an error.
    Strict,
    /// Attribute access on undefined values yields undefined.
    Chainable,
}

impl From<UndefinedMode> for UndefinedBehavior {
    fn from(mode: UndefinedMode) -> Self {
        match mode {
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
            UndefinedMode::Strict => UndefinedBehavior::Strict,
            UndefinedMode::Chainable => UndefinedBehavior::Chainable,
        }
    }
}

fn default_autoescape_extensions() -> Vec<String> {
    vec!["html".into(), "htm".into(), "xml".into()]
}

/// Settings applied to the engine when it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub autoescape: AutoescapeMode,
    /// Extensions (without the dot) escaped under [`AutoescapeMode::ByExtension`].
    pub autoescape_extensions: Vec<String>,
    pub undefined: UndefinedMode,
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
    /// Values available to every template.
    pub globals: BTreeMap<String, serde_json::Value>,
    /// Messages for the i18n functions.
    pub translations: Catalog,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            autoescape: AutoescapeMode::default(),
            autoescape_extensions: default_autoescape_extensions(),
            undefined: UndefinedMode::default(),
            trim_blocks: false,
            lstrip_blocks: false,
            keep_trailing_newline: false,
            globals: BTreeMap::new(),
            translations: Catalog::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self, SetupError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn autoescape(mut self, mode: AutoescapeMode) -> Self {
        self.autoescape = mode;
        self
    }

    pub fn undefined(mut self, mode: UndefinedMode) -> Self {
        self.undefined = mode;
        self
    }

    /// Adds a global available to every template.
    ///
    /// A value that cannot be represented as JSON (e.g. a map with non-string
    /// keys) is logged at `warn` and left out.
    pub fn global(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.globals.insert(name, value);
            }
            Err(err) => {
                tracing::warn!(global = %name, error = %err, "dropping global that cannot be serialized");
            }
        }
        self
    }

    pub fn translations(mut self, catalog: Catalog) -> Self {
        self.translations = catalog;
        self
    }

    /// Applies everything except the translations to `env`.
    pub(crate) fn apply(&self, env: &mut Environment<'static>) {
        env.set_undefined_behavior(self.undefined.into());
        env.set_trim_blocks(self.trim_blocks);
        env.set_lstrip_blocks(self.lstrip_blocks);
        env.set_keep_trailing_newline(self.keep_trailing_newline);

        match self.autoescape {
            AutoescapeMode::None => env.set_auto_escape_callback(|_| AutoEscape::None),
            AutoescapeMode::Html => env.set_auto_escape_callback(|_| AutoEscape::Html),
            AutoescapeMode::ByExtension => {
                let extensions = self.autoescape_extensions.clone();
                env.set_auto_escape_callback(move |name| {
                    let escaped = name
                        .rsplit_once('.')
                        .is_some_and(|(_, ext)| extensions.iter().any(|e| e == ext));
                    if escaped {
                        AutoEscape::Html
                    } else {
                        AutoEscape::None
                    }
                });
            }
        }

        for (name, value) in &self.globals {
            env.add_global(name.clone(), minijinja::Value::from_serialize(value));
        }
    }
}
