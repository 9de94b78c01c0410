//! Shared state handed to every handler.

use std::sync::Arc;

use recipio_config::BasePath;
use recipio_i18n::{Catalogs, Locale};
use recipio_recipes::{AccountSource, RecipeSource};
use recipio_telemetry::Metrics;

pub(crate) struct ApiState {
    pub(crate) recipes: Arc<dyn RecipeSource>,
    pub(crate) accounts: Arc<dyn AccountSource>,
    pub(crate) telemetry: Metrics,
    pub(crate) base_path: BasePath,
    pub(crate) catalogs: &'static Catalogs,
}

impl ApiState {
    pub(crate) fn new(
        recipes: Arc<dyn RecipeSource>,
        accounts: Arc<dyn AccountSource>,
        telemetry: Metrics,
        base_path: BasePath,
    ) -> Self {
        Self {
            recipes,
            accounts,
            telemetry,
            base_path,
            catalogs: Catalogs::embedded(),
        }
    }

    /// Catalog string for `key` in `locale`, with fallbacks applied.
    pub(crate) fn text(&self, locale: Locale, key: &str) -> String {
        self.catalogs.text(locale, key)
    }

    /// Count a rendered page.
    pub(crate) fn page_rendered(&self, page: &str, locale: Locale) {
        self.telemetry.inc_page_render(page, locale.code());
    }
}
