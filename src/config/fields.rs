//! HTML form field names.
//!
//! These are the names the WordPress login form (with the SiteGuard CAPTCHA
//! plugin) and the MW WP Form admin screen expect.

// Login form
/// Username field
pub const FIELD_LOG: &str = "log";
/// Password field
pub const FIELD_PWD: &str = "pwd";
/// CAPTCHA answer field
pub const FIELD_CAPTCHA: &str = "siteguard_captcha";
/// Hidden CAPTCHA prefix field, echoed back with the answer
pub const FIELD_CAPTCHA_PREFIX: &str = "siteguard_captcha_prefix";
/// Submit button field
pub const FIELD_WP_SUBMIT: &str = "wp-submit";
/// Post-login redirect target
pub const FIELD_REDIRECT_TO: &str = "redirect_to";
/// Cookie test marker
pub const FIELD_TESTCOOKIE: &str = "testcookie";

/// Label of the login submit button (the Japanese admin UI sends this value)
pub const WP_SUBMIT_LABEL: &str = "ログイン";

// Export form
/// Post type of the form whose entries are exported
pub const FIELD_POST_TYPE: &str = "post_type";
/// Page number of the entry listing
pub const FIELD_PAGED: &str = "paged";
/// Export every entry rather than the current page
pub const FIELD_DOWNLOAD_ALL: &str = "download-all";
/// Marks the request as a CSV download
pub const FIELD_CSV_DOWNLOAD: &str = "mw-wp-form-csv-download";
/// Anti-forgery token
pub const FIELD_WPNONCE: &str = "_wpnonce";
/// Referer the nonce was issued for
pub const FIELD_WP_HTTP_REFERER: &str = "_wp_http_referer";
