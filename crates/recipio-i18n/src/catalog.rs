//! Embedded message catalogs.
//!
//! # Design
//! - One JSON catalog per locale, compiled in with `include_str!`.
//! - Nested objects flatten to dotted keys (`RecipeDetail.ingredients`).
//! - Lookups try the requested locale, then the other locale, then echo the key.
//! - A catalog that fails to parse degrades to empty and logs once at load time.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use serde_json::Value;
use tracing::error;

use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;

/// Flattened key/value messages for one locale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Parse a nested JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::CatalogInvalid`] when the document is not a JSON object.
    pub fn from_json(locale: Locale, raw: &str) -> I18nResult<Self> {
        let tree: Value = serde_json::from_str(raw).map_err(|err| I18nError::CatalogInvalid {
            locale,
            detail: err.to_string(),
        })?;
        if !tree.is_object() {
            return Err(I18nError::CatalogInvalid {
                locale,
                detail: "root is not an object".to_string(),
            });
        }
        let mut messages = HashMap::new();
        flatten(&tree, String::new(), &mut messages);
        Ok(Self { messages })
    }

    /// Message for a dotted key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog carries no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

fn flatten(node: &Value, prefix: String, out: &mut HashMap<String, String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(child, path, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix, text.clone());
        }
        Value::Number(number) => {
            out.insert(prefix, number.to_string());
        }
        Value::Bool(_) | Value::Null | Value::Array(_) => {}
    }
}

/// Static mapping from every supported locale to its catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalogs {
    tr: MessageCatalog,
    en: MessageCatalog,
}

static EMBEDDED: LazyLock<Catalogs> = LazyLock::new(|| Catalogs {
    tr: load_embedded(Locale::Tr),
    en: load_embedded(Locale::En),
});

impl Catalogs {
    /// Build from explicit catalogs.
    #[must_use]
    pub const fn new(tr: MessageCatalog, en: MessageCatalog) -> Self {
        Self { tr, en }
    }

    /// Catalogs compiled into the binary.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &EMBEDDED
    }

    /// Catalog for a locale.
    #[must_use]
    pub const fn get(&self, locale: Locale) -> &MessageCatalog {
        match locale {
            Locale::Tr => &self.tr,
            Locale::En => &self.en,
        }
    }

    /// Localised text for `key`, falling back to the other locale and finally the key itself.
    #[must_use]
    pub fn text(&self, locale: Locale, key: &str) -> String {
        self.lookup(locale, key)
            .map_or_else(|| key.to_string(), ToString::to_string)
    }

    /// Like [`Catalogs::text`] but substitutes `{name}` placeholders.
    #[must_use]
    pub fn format(&self, locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.text(locale, key), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Every known key resolved for `locale`, with fallback already applied.
    #[must_use]
    pub fn resolved(&self, locale: Locale) -> BTreeMap<String, String> {
        self.get(locale.other())
            .keys()
            .chain(self.get(locale).keys())
            .filter_map(|key| {
                self.lookup(locale, key)
                    .map(|text| (key.to_string(), text.to_string()))
            })
            .collect()
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        locale
            .fallback_chain()
            .into_iter()
            .find_map(|candidate| self.get(candidate).get(key))
    }
}

fn load_embedded(locale: Locale) -> MessageCatalog {
    let raw = match locale {
        Locale::Tr => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/i18n/tr.json")),
        Locale::En => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/i18n/en.json")),
    };
    MessageCatalog::from_json(locale, raw).unwrap_or_else(|err| {
        error!(error = %err, locale = locale.code(), "failed to parse message catalog");
        MessageCatalog::default()
    })
}
