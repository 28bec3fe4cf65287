//! Admin panel login.
//!
//! Every attempt opens a fresh cookie session, reads a new CAPTCHA from the
//! login page, and submits it with the credentials. Attempts that fail in a
//! way a new CAPTCHA could fix are retried with backoff; a login page without
//! a CAPTCHA is reported at once.

mod page;

use std::sync::atomic::{AtomicU32, Ordering};

use log::{info, warn};
use tokio_retry::RetryIf;

use crate::captcha::CaptchaSolver;
use crate::config::{
    Config, Credentials, FIELD_CAPTCHA, FIELD_CAPTCHA_PREFIX, FIELD_LOG, FIELD_PWD,
    FIELD_REDIRECT_TO, FIELD_TESTCOOKIE, FIELD_WP_SUBMIT, WP_SUBMIT_LABEL,
};
use crate::error_handling::{get_login_retry_strategy, LoginError};
use crate::initialization::init_session_client;
use crate::site::{is_admin_landing, Site};

pub use page::{parse_login_page, LoginChallenge};

/// Logs in and returns the authenticated session client.
///
/// # Errors
///
/// Returns the error of the last attempt once `config.max_login_attempts`
/// attempts are used up, or immediately for errors a retry cannot fix
/// (see [`LoginError::is_retriable`]).
pub async fn login(
    site: &Site,
    config: &Config,
    credentials: &Credentials,
    solver: &CaptchaSolver,
) -> Result<reqwest::Client, LoginError> {
    let (Some(username), Some(password)) = (
        credentials.wp_username.as_deref(),
        credentials.wp_password.as_deref(),
    ) else {
        return Err(LoginError::MissingCredentials);
    };

    let max_attempts = config.max_login_attempts.max(1);
    let attempt = AtomicU32::new(0);

    RetryIf::start(
        get_login_retry_strategy(config.login_retry_delay_ms, max_attempts),
        || {
            let n = attempt.fetch_add(1, Ordering::SeqCst) + 1;
            info!("Login attempt {}/{}", n, max_attempts);
            attempt_login(site, config, username, password, solver)
        },
        |e: &LoginError| {
            let retry = e.is_retriable();
            if retry {
                warn!("Login attempt failed: {}", e);
            }
            retry
        },
    )
    .await
}

async fn attempt_login(
    site: &Site,
    config: &Config,
    username: &str,
    password: &str,
    solver: &CaptchaSolver,
) -> Result<reqwest::Client, LoginError> {
    let client = init_session_client(config)?;

    let response = client.get(site.login_url().clone()).send().await?;
    let page_url = response.url().clone();
    let body = response.text().await?;

    let challenge =
        parse_login_page(&body).ok_or_else(|| LoginError::CaptchaNotFound(page_url.to_string()))?;
    let image_url =
        page_url
            .join(&challenge.image_src)
            .map_err(|source| LoginError::InvalidCaptchaUrl {
                url: challenge.image_src.clone(),
                source,
            })?;

    let response = client.get(image_url).send().await?;
    if !response.status().is_success() {
        return Err(LoginError::CaptchaImage(response.status()));
    }
    let image = response.bytes().await?;

    let answer = solver.solve(&image).await?;
    info!("CAPTCHA read as {}", answer);

    let redirect_to = site.admin_url();
    let form = [
        (FIELD_LOG, username),
        (FIELD_PWD, password),
        (FIELD_CAPTCHA, answer.as_str()),
        (FIELD_CAPTCHA_PREFIX, challenge.prefix.as_str()),
        (FIELD_WP_SUBMIT, WP_SUBMIT_LABEL),
        (FIELD_REDIRECT_TO, redirect_to.as_str()),
        (FIELD_TESTCOOKIE, "1"),
    ];

    let response = client
        .post(site.login_url().clone())
        .form(&form)
        .send()
        .await?;

    if is_admin_landing(response.url()) {
        info!("Login succeeded");
        Ok(client)
    } else {
        Err(LoginError::Rejected(response.url().to_string()))
    }
}
