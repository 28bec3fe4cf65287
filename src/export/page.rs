//! Entry listing scraping.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

static NONCE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("input[name='_wpnonce']", "NONCE_SELECTOR"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "TITLE_SELECTOR"));

/// Returns the value of the last `_wpnonce` field on the page.
///
/// The listing carries several forms (bulk actions, filters, the CSV
/// download); the download form comes last.
pub fn extract_export_nonce(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&NONCE_SELECTOR)
        .filter_map(|el| el.value().attr("value"))
        .filter(|v| !v.is_empty())
        .last()
        .map(str::to_string)
}

/// Page title, for diagnostics.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
