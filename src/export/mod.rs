//! CSV export of form entries.
//!
//! MW WP Form offers a "download all" CSV button on its entry listing. The
//! button posts a form protected by a WordPress nonce, so the listing is
//! loaded first to scrape a fresh one.

mod page;

use std::path::Path;

use log::{debug, info, warn};

use crate::config::{
    Config, DEBUG_PAGE_FILE, EXPORT_HEADER_MARKER, FIELD_CSV_DOWNLOAD, FIELD_DOWNLOAD_ALL,
    FIELD_PAGED, FIELD_POST_TYPE, FIELD_WPNONCE, FIELD_WP_HTTP_REFERER,
};
use crate::error_handling::ExportError;
use crate::site::Site;

pub use page::{extract_export_nonce, page_title};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Downloads the CSV export of every entry of the form.
///
/// # Errors
///
/// - `SessionExpired` if the listing redirects to a login page
/// - `NonceNotFound` if the listing has no `_wpnonce` field
/// - `NotCsv` if the response does not start with the `"ID"` header cell
/// - `Http` for transport failures
pub async fn fetch_export(
    client: &reqwest::Client,
    site: &Site,
    config: &Config,
) -> Result<Vec<u8>, ExportError> {
    let response = client.get(site.export_url().clone()).send().await?;
    let page_url = response.url().clone();
    info!("Export page {} ({})", page_url, response.status());

    if site.is_login_page(&page_url) {
        return Err(ExportError::SessionExpired(page_url.to_string()));
    }

    let body = response.text().await?;
    if !body.contains(FIELD_WPNONCE) {
        warn!(
            "No {} on export page, title: {:?}",
            FIELD_WPNONCE,
            page_title(&body)
        );
        if let Some(dir) = &config.debug_dir {
            save_debug_page(dir, &body).await;
        }
    }

    let nonce = extract_export_nonce(&body)
        .ok_or_else(|| ExportError::NonceNotFound(page_url.to_string()))?;
    debug!("Export nonce: {}", nonce);

    let referer = site.export_referer();
    let form = [
        (FIELD_POST_TYPE, site.post_type()),
        (FIELD_PAGED, "1"),
        (FIELD_DOWNLOAD_ALL, "true"),
        (FIELD_CSV_DOWNLOAD, "1"),
        (FIELD_WPNONCE, nonce.as_str()),
        (FIELD_WP_HTTP_REFERER, referer.as_str()),
    ];

    let response = client
        .post(site.export_url().clone())
        .form(&form)
        .send()
        .await?;
    let bytes = response.bytes().await?;

    if !is_csv_export(&bytes) {
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(40)]).into_owned();
        return Err(ExportError::NotCsv(head));
    }

    info!("Downloaded CSV export ({} bytes)", bytes.len());
    Ok(bytes.to_vec())
}

/// True if `bytes` starts with the export header, optionally after a UTF-8 BOM.
pub fn is_csv_export(bytes: &[u8]) -> bool {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    body.starts_with(EXPORT_HEADER_MARKER)
}

async fn save_debug_page(dir: &Path, body: &str) {
    let path = dir.join(DEBUG_PAGE_FILE);
    match tokio::fs::write(&path, body).await {
        Ok(()) => info!("Saved export page to {}", path.display()),
        Err(e) => warn!("Could not save export page to {}: {}", path.display(), e),
    }
}
