//! Switch planning shared by the client session and the locale-switching endpoint.

use recipio_config::BasePath;

use crate::locale::Locale;

/// Outcome of a requested locale change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocaleSwitch {
    /// The requested locale is already active; nothing to do.
    Unchanged(Locale),
    /// The requested value is not a supported locale.
    Ignored {
        /// Raw value that was requested.
        requested: String,
    },
    /// Persist the locale and reload.
    Switch(Locale),
    /// A switch is already in flight; further requests wait for the reload.
    Pending {
        /// Locale the in-flight switch is heading to.
        to: Locale,
    },
}

/// Decide what a request to move from `active` to `requested` should do.
#[must_use]
pub fn plan_locale_switch(active: Locale, requested: &str) -> LocaleSwitch {
    match Locale::parse(requested) {
        None => LocaleSwitch::Ignored {
            requested: requested.to_string(),
        },
        Some(locale) if locale == active => LocaleSwitch::Unchanged(locale),
        Some(locale) => LocaleSwitch::Switch(locale),
    }
}

/// Restrict a `next` value to a same-site absolute path; anything else becomes `/`.
#[must_use]
pub fn sanitize_next_path(next: &str) -> &str {
    let same_site = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control);
    if same_site { next } else { "/" }
}

/// Full-reload destination for `next` under the site's base path.
///
/// Characters outside printable ASCII are percent-encoded so the target is a
/// valid `Location` value; path and query delimiters are kept.
#[must_use]
pub fn reload_target(base: &BasePath, next: &str) -> String {
    encode_target(&base.join(sanitize_next_path(next)))
}

fn encode_target(target: &str) -> String {
    let mut encoded = String::with_capacity(target.len());
    let mut buf = [0_u8; 4];
    for ch in target.chars() {
        if ch.is_ascii_graphic() {
            encoded.push(ch);
        } else {
            encoded.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planning_distinguishes_outcomes() {
        assert_eq!(plan_locale_switch(Locale::Tr, "en"), LocaleSwitch::Switch(Locale::En));
        assert_eq!(
            plan_locale_switch(Locale::En, "en"),
            LocaleSwitch::Unchanged(Locale::En)
        );
        assert_eq!(
            plan_locale_switch(Locale::Tr, "de"),
            LocaleSwitch::Ignored {
                requested: "de".to_string()
            }
        );
    }

    #[test]
    fn next_path_must_stay_on_site() {
        assert_eq!(sanitize_next_path("/recipes/7?servings=2"), "/recipes/7?servings=2");
        for hostile in ["", "recipes", "//evil.example", "https://evil.example", "/\\evil", "/a\nb"] {
            assert_eq!(sanitize_next_path(hostile), "/", "{hostile:?}");
        }
    }

    #[test]
    fn reload_target_prefixes_base_path() -> recipio_config::ConfigResult<()> {
        assert_eq!(reload_target(&BasePath::root(), "/categories"), "/categories");
        let base = BasePath::parse("/app")?;
        assert_eq!(reload_target(&base, "/categories"), "/app/categories");
        assert_eq!(reload_target(&base, "//evil"), "/app/");
        Ok(())
    }

    #[test]
    fn reload_target_encodes_spaces_and_turkish_paths() {
        let root = BasePath::root();
        assert_eq!(
            reload_target(&root, "/recipes?search=lentil soup&limit=6"),
            "/recipes?search=lentil%20soup&limit=6"
        );
        assert_eq!(
            reload_target(&root, "/categories/çorbalar"),
            "/categories/%C3%A7orbalar"
        );
        assert_eq!(
            reload_target(&root, "/categories/%C3%A7orbalar"),
            "/categories/%C3%A7orbalar"
        );
    }
}
