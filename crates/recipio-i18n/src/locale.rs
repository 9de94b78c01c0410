//! Supported locales and the order in which they fall back to each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;

/// Locales the site ships content for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Turkish.
    #[default]
    Tr,
    /// English.
    En,
}

/// Locale used whenever no valid preference is available.
pub const DEFAULT_LOCALE: Locale = Locale::Tr;

impl Locale {
    /// All supported locales in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Tr, Self::En]
    }

    /// Two-letter code used in cookies, query strings, and catalog names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }

    /// Native-language label for the language picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tr => "Türkçe",
            Self::En => "English",
        }
    }

    /// Value for the document `lang` attribute.
    #[must_use]
    pub const fn html_lang(self) -> &'static str {
        self.code()
    }

    /// BCP 47 tag used when formatting dates for this locale.
    #[must_use]
    pub const fn date_locale(self) -> &'static str {
        match self {
            Self::Tr => "tr-TR",
            Self::En => "en-US",
        }
    }

    /// The other supported locale.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Tr => Self::En,
            Self::En => Self::Tr,
        }
    }

    /// Lookup order for bilingual content: the locale itself, then the other one.
    #[must_use]
    pub const fn fallback_chain(self) -> [Self; 2] {
        [self, self.other()]
    }

    /// Exact match against the supported codes.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|locale| locale.code() == value)
    }

    /// Resolve an optional raw preference, falling back to [`DEFAULT_LOCALE`].
    #[must_use]
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(DEFAULT_LOCALE)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| I18nError::UnsupportedLocale {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_accepts_only_supported_codes() {
        assert_eq!(Locale::parse("tr"), Some(Locale::Tr));
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        for raw in ["", "de", "EN", " en", "en-US", "tr_TR"] {
            assert_eq!(Locale::parse(raw), None, "{raw:?} should not parse");
        }
    }

    #[test]
    fn resolve_defaults_to_turkish() {
        assert_eq!(Locale::resolve(None), Locale::Tr);
        assert_eq!(Locale::resolve(Some("fr")), Locale::Tr);
        assert_eq!(Locale::resolve(Some("en")), Locale::En);
        assert_eq!(DEFAULT_LOCALE, Locale::default());
    }

    #[test]
    fn fallback_chain_covers_both_locales() {
        assert_eq!(Locale::En.fallback_chain(), [Locale::En, Locale::Tr]);
        assert_eq!(Locale::Tr.fallback_chain(), [Locale::Tr, Locale::En]);
    }

    #[test]
    fn from_str_reports_unsupported_value() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "de".parse::<Locale>(),
            Err(I18nError::UnsupportedLocale {
                value: "de".to_string()
            })
        );
    }

    #[test]
    fn serde_uses_lowercase_codes() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Locale::Tr)?, "\"tr\"");
        assert_eq!(serde_json::from_str::<Locale>("\"en\"")?, Locale::En);
        Ok(())
    }

    proptest! {
        /// Only the two exact lowercase codes parse.
        #[test]
        fn parse_rejects_every_other_string(raw in ".*") {
            let parsed = Locale::parse(&raw);
            match raw.as_str() {
                "tr" => prop_assert_eq!(parsed, Some(Locale::Tr)),
                "en" => prop_assert_eq!(parsed, Some(Locale::En)),
                _ => prop_assert_eq!(parsed, None),
            }
        }

        /// Resolution always lands on a supported locale.
        #[test]
        fn resolve_always_yields_a_supported_locale(raw in ".*") {
            let resolved = Locale::resolve(Some(&raw));
            prop_assert!(matches!(resolved, Locale::Tr | Locale::En));
            if raw != "en" {
                prop_assert_eq!(resolved, Locale::Tr);
            }
        }

        /// Near misses on the codes never parse.
        #[test]
        fn decorated_codes_are_rejected(code in "(tr|en)", pad in "[ A-Z_-]{1,4}") {
            prop_assert_eq!(Locale::parse(&format!("{pad}{code}")), None);
            prop_assert_eq!(Locale::parse(&format!("{code}{pad}")), None);
        }
    }
}
