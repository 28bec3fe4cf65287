//! URLs of the WordPress site being watched.

use url::Url;

use crate::config::{WP_ADMIN_MARKER, WP_LOGIN_MARKER};

/// Resolved URLs for one site and form.
#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
    login_url: Url,
    login_path: String,
    export_url: Url,
    post_type: String,
}

impl Site {
    /// Builds the site URLs.
    ///
    /// `site_url` is the WordPress root (the directory containing `wp-admin/`),
    /// with or without a trailing slash. `login_path` is relative to it.
    pub fn new(site_url: &str, login_path: &str, post_type: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(site_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let login_path = login_path.trim_start_matches('/');
        let login_url = base.join(login_path)?;
        let mut export_url = base.join("wp-admin/edit.php")?;
        export_url
            .query_pairs_mut()
            .append_pair("post_type", post_type);

        Ok(Self {
            base,
            login_url,
            login_path: login_path.to_string(),
            export_url,
            post_type: post_type.to_string(),
        })
    }

    /// Login page.
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// Admin dashboard, used as the post-login redirect target.
    pub fn admin_url(&self) -> String {
        format!("{}{}/", self.base, WP_ADMIN_MARKER)
    }

    /// Entry listing of the form, where the CSV export is triggered.
    pub fn export_url(&self) -> &Url {
        &self.export_url
    }

    /// Form post type.
    pub fn post_type(&self) -> &str {
        &self.post_type
    }

    /// Path and query of the entry listing, as WordPress expects in
    /// `_wp_http_referer`.
    pub fn export_referer(&self) -> String {
        match self.export_url.query() {
            Some(q) => format!("{}?{}", self.export_url.path(), q),
            None => self.export_url.path().to_string(),
        }
    }

    /// True if `url` is a login page (stock or renamed).
    pub fn is_login_page(&self, url: &Url) -> bool {
        let s = url.as_str();
        s.contains(WP_LOGIN_MARKER)
            || (!self.login_path.is_empty() && url.path().ends_with(&self.login_path))
    }
}

/// True if a login POST ended inside the admin area.
pub fn is_admin_landing(url: &Url) -> bool {
    let s = url.as_str();
    s.contains(WP_ADMIN_MARKER) && !s.to_lowercase().contains("login")
}
