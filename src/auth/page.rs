//! Login page scraping.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

static CAPTCHA_IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("img[src*='captcha']", "CAPTCHA_IMAGE_SELECTOR"));

static CAPTCHA_PREFIX_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe(
        "input[name='siteguard_captcha_prefix']",
        "CAPTCHA_PREFIX_SELECTOR",
    )
});

/// What a login attempt needs from the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginChallenge {
    /// `src` of the CAPTCHA image, possibly relative
    pub image_src: String,
    /// Value of the hidden `siteguard_captcha_prefix` field
    pub prefix: String,
}

/// Extracts the CAPTCHA image and prefix from a login page.
///
/// Returns `None` unless both are present and non-empty.
pub fn parse_login_page(html: &str) -> Option<LoginChallenge> {
    let document = Html::parse_document(html);

    let image_src = document
        .select(&CAPTCHA_IMAGE_SELECTOR)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())?
        .to_string();

    let prefix = document
        .select(&CAPTCHA_PREFIX_SELECTOR)
        .filter_map(|el| el.value().attr("value"))
        .find(|v| !v.is_empty())?
        .to_string();

    log::debug!("Login page CAPTCHA: src={} prefix={}", image_src, prefix);

    Some(LoginChallenge { image_src, prefix })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>ログイン</title></head>
<body class="login">
<form name="loginform" id="loginform" action="https://example.com/_wp/login_09645" method="post">
  <p><input type="text" name="log" id="user_login"></p>
  <p><input type="password" name="pwd" id="user_pass"></p>
  <p><img src="/_wp/wp-content/siteguard/captcha_1234.png?x=1&amp;y=2" alt="CAPTCHA"></p>
  <p><input type="text" name="siteguard_captcha" id="siteguard_captcha"></p>
  <input type="hidden" name="siteguard_captcha_prefix" id="siteguard_captcha_prefix" value="987654321">
  <p class="submit"><input type="submit" name="wp-submit" value="ログイン"></p>
</form>
<img src="/_wp/wp-includes/images/w-logo-blue.png">
</body></html>"#;

    #[test]
    fn test_parse_login_page() {
        let challenge = parse_login_page(LOGIN_PAGE).unwrap();
        assert_eq!(
            challenge.image_src,
            "/_wp/wp-content/siteguard/captcha_1234.png?x=1&y=2"
        );
        assert_eq!(challenge.prefix, "987654321");
    }

    #[test]
    fn test_parse_login_page_without_captcha() {
        let html = LOGIN_PAGE.replace("captcha_1234", "logo");
        assert!(parse_login_page(&html).is_none());
    }

    #[test]
    fn test_parse_login_page_without_prefix() {
        let html = LOGIN_PAGE.replace("value=\"987654321\"", "value=\"\"");
        assert!(parse_login_page(&html).is_none());
    }

    #[test]
    fn test_parse_login_page_empty() {
        assert!(parse_login_page("").is_none());
    }
}
