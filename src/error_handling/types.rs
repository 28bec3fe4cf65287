//! Error type definitions.
//!
//! This module defines the error types of every pipeline stage.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use thiserror::Error;

use super::retry::is_transient_http_error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Why the CAPTCHA could not be read.
#[derive(Error, Debug)]
pub enum CaptchaError {
    /// No vision API key configured.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// The vision API answered with a non-success status.
    #[error("Vision API error: {status} - {body}")]
    Api {
        /// HTTP status returned by the API
        status: StatusCode,
        /// Start of the response body
        body: String,
    },

    /// The response had no assistant message content.
    #[error("Vision API response has no message content")]
    MissingContent,

    /// The model did not return enough characters from the answer range.
    #[error("Could not read {expected} characters from model output {output:?}")]
    Unreadable {
        /// Required answer length
        expected: usize,
        /// Raw model output
        output: String,
    },

    /// Transport or decoding failure talking to the API.
    #[error("Vision API request failed: {0}")]
    Http(#[from] ReqwestError),
}

/// Error types for the login stage.
#[derive(Error, Debug)]
pub enum LoginError {
    /// WordPress username or password is missing.
    #[error("WP_USERNAME/WP_PASSWORD not set")]
    MissingCredentials,

    /// The login page has no CAPTCHA image or prefix field.
    #[error("CAPTCHA not found on login page {0}")]
    CaptchaNotFound(String),

    /// The CAPTCHA image URL could not be resolved.
    #[error("Invalid CAPTCHA image URL {url:?}: {source}")]
    InvalidCaptchaUrl {
        /// The `src` attribute as found in the page
        url: String,
        /// Parse failure
        source: url::ParseError,
    },

    /// The CAPTCHA image answered with a non-success status (SiteGuard
    /// deletes expired images; the next login page links a new one).
    #[error("CAPTCHA image request failed with {0}")]
    CaptchaImage(StatusCode),

    /// The CAPTCHA could not be solved for this attempt.
    #[error("CAPTCHA recognition failed: {0}")]
    CaptchaUnsolved(#[from] CaptchaError),

    /// The site did not accept the login and sent us back to a login page.
    #[error("Login rejected, ended on {0}")]
    Rejected(String),

    /// Transport failure.
    #[error("Login request failed: {0}")]
    Http(#[from] ReqwestError),
}

impl LoginError {
    /// Returns true if a fresh attempt with a new CAPTCHA could succeed.
    ///
    /// A missing CAPTCHA or missing credentials will not change between
    /// attempts; a misread CAPTCHA or a flaky connection might.
    pub fn is_retriable(&self) -> bool {
        match self {
            LoginError::CaptchaImage(_)
            | LoginError::CaptchaUnsolved(_)
            | LoginError::Rejected(_) => true,
            LoginError::Http(e) => is_transient_http_error(e),
            LoginError::MissingCredentials
            | LoginError::CaptchaNotFound(_)
            | LoginError::InvalidCaptchaUrl { .. } => false,
        }
    }
}

/// Error types for the CSV export stage.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The admin screen redirected to a login page.
    #[error("Session expired, redirected to {0}")]
    SessionExpired(String),

    /// No `_wpnonce` field on the admin screen.
    #[error("Nonce not found on {0}")]
    NonceNotFound(String),

    /// The export response is not a CSV export.
    #[error("Export response is not CSV (starts with {0:?})")]
    NotCsv(String),

    /// Transport failure.
    #[error("Export request failed: {0}")]
    Http(#[from] ReqwestError),
}

/// Error types for push notifications.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// LINE channel token or target ID missing.
    #[error("LINE_CHANNEL_TOKEN/LINE_TARGET_ID not set")]
    NotConfigured,

    /// The push API answered with something other than 200.
    #[error("Push rejected: {status} - {body}")]
    Rejected {
        /// HTTP status returned by the API
        status: StatusCode,
        /// Start of the response body
        body: String,
    },

    /// Transport failure.
    #[error("Push request failed: {0}")]
    Http(#[from] ReqwestError),
}

/// Error types for the checkpoint file.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Writing the checkpoint failed.
    #[error("Failed to write checkpoint {path}: {source}")]
    Write {
        /// Checkpoint file path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Reasons a run ended early.
#[derive(Error, Debug)]
pub enum CheckError {
    /// A required setting is missing.
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    /// The site URL does not parse.
    #[error("Invalid site URL {url:?}: {source}")]
    InvalidSiteUrl {
        /// The configured value
        url: String,
        /// Parse failure
        source: url::ParseError,
    },

    /// HTTP client setup failed.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// Login failed after all attempts.
    #[error("Login failed: {0}")]
    Login(#[from] LoginError),

    /// CSV export failed.
    #[error("CSV download failed: {0}")]
    Export(#[from] ExportError),

    /// The checkpoint could not be saved.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
