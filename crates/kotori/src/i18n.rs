//! Message lookup for the i18n extension.
//!
//! The engine exposes three functions to templates:
//!
//! | Function | Behavior |
//! |----------|----------|
//! | `_(msg)` | alias of `gettext` |
//! | `gettext(msg)` | translated message, or `msg` itself when untranslated |
//! | `ngettext(singular, plural, n)` | picks by `n == 1`, translates, replaces `%(num)s` with `n` |
//!
//! ```jinja
//! {{ gettext("Hello") }}
//! {{ ngettext("%(num)s apple", "%(num)s apples", count) }}
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// A table of translated messages, keyed by message id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    messages: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from a flat YAML mapping of `msgid: msgstr`.
    pub fn from_yaml(yaml: &str) -> Result<Self, SetupError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn insert(mut self, msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        self.messages.insert(msgid.into(), msgstr.into());
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn gettext(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }

    pub fn ngettext(&self, singular: &str, plural: &str, n: i64) -> String {
        let msgid = if n == 1 { singular } else { plural };
        self.gettext(msgid).replace("%(num)s", &n.to_string())
    }
}

/// Registers `_`, `gettext` and `ngettext` on the environment.
pub(crate) fn install(env: &mut Environment<'static>, catalog: Arc<Catalog>) {
    let lookup = Arc::clone(&catalog);
    env.add_function("gettext", move |msgid: String| -> String {
        lookup.gettext(&msgid)
    });

    let lookup = Arc::clone(&catalog);
    env.add_function("_", move |msgid: String| -> String { lookup.gettext(&msgid) });

    env.add_function(
        "ngettext",
        move |singular: String, plural: String, n: i64| -> String {
            catalog.ngettext(&singular, &plural, n)
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gettext_falls_back_to_msgid() {
        let catalog = Catalog::new().insert("Hello", "こんにちは");
        assert_eq!(catalog.gettext("Hello"), "こんにちは");
        assert_eq!(catalog.gettext("Goodbye"), "Goodbye");
    }

    #[test]
    fn test_ngettext_picks_form_and_formats() {
        let catalog = Catalog::new();
        assert_eq!(catalog.ngettext("%(num)s apple", "%(num)s apples", 1), "1 apple");
        assert_eq!(catalog.ngettext("%(num)s apple", "%(num)s apples", 3), "3 apples");
        assert_eq!(catalog.ngettext("%(num)s apple", "%(num)s apples", 0), "0 apples");
    }

    #[test]
    fn test_ngettext_translates_chosen_form() {
        let catalog = Catalog::new().insert("%(num)s apples", "%(num)s pommes");
        assert_eq!(catalog.ngettext("%(num)s apple", "%(num)s apples", 2), "2 pommes");
    }

    #[test]
    fn test_from_yaml() {
        let catalog = Catalog::from_yaml("Hello: Bonjour\nBye: Au revoir\n").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.gettext("Bye"), "Au revoir");
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(Catalog::from_yaml("- not\n- a mapping\n").is_err());
    }

    #[test]
    fn test_install_registers_functions() {
        let mut env = Environment::new();
        install(&mut env, Arc::new(Catalog::new().insert("Hello", "Hallo")));

        let output = env
            .render_str(
                "{{ gettext('Hello') }} {{ ngettext('one', 'many', 2) }}",
                minijinja::context! {},
            )
            .unwrap();
        assert_eq!(output, "Hallo many");
    }
}
