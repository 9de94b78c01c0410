//! Cookie header parsing and the persisted locale cookie.

use recipio_config::BasePath;

use crate::locale::Locale;

/// Name of the cookie holding the visitor's locale preference.
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";
/// Lifetime of the locale cookie (one year).
pub const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Ordered name/value pairs parsed from a `Cookie` header or `document.cookie`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    /// Parse a `name=value; name2=value2` string. Values are percent-decoded;
    /// segments without `=` are skipped.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let entries = header
            .split(';')
            .filter_map(|segment| {
                let (name, value) = segment.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                let value = value.trim().trim_matches('"');
                let decoded = urlencoding::decode(value)
                    .map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned);
                Some((name.to_string(), decoded))
            })
            .collect();
        Self { entries }
    }

    /// First value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value.as_str())
    }

    /// Insert or replace `name`.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(candidate, _)| candidate == name) {
            entry.1 = value.to_string();
        } else {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    /// Render back to a `name=value; ...` string with percent-encoded values.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Attributes for writing the locale cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleCookie {
    path: String,
}

impl LocaleCookie {
    /// Cookie scoped to the site's base path.
    #[must_use]
    pub fn new(base: &BasePath) -> Self {
        Self {
            path: base.cookie_path().to_string(),
        }
    }

    /// `Path` attribute.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full cookie string, usable as a `Set-Cookie` value or a `document.cookie` assignment.
    #[must_use]
    pub fn header_value(&self, locale: Locale) -> String {
        format!(
            "{LOCALE_COOKIE}={}; Path={}; Max-Age={LOCALE_COOKIE_MAX_AGE_SECS}; SameSite=Lax",
            locale.code(),
            self.path
        )
    }
}
