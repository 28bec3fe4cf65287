//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients for the admin
//! panel session and for the remote JSON APIs.

use std::time::Duration;

use crate::config::Config;
use reqwest::ClientBuilder;

/// Initializes a cookie-backed client for one admin panel session.
///
/// Creates a `reqwest::Client` configured with:
/// - Its own cookie store, so every login attempt starts from a clean session
/// - User-Agent header and timeout from the config
/// - Redirect following enabled (reqwest default, up to 10 hops)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_session_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
}

/// Initializes the client used for the vision and push APIs.
///
/// No cookies; same timeout as the session client.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_api_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!("form_notifier/", env!("CARGO_PKG_VERSION")))
        .build()
}
