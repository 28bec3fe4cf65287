//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every option can also be set through an environment
//! variable so the binary runs unattended from a scheduler with no arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_LOGIN_PATH, DEFAULT_PUSH_API_URL, DEFAULT_STATE_FILE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_VISION_API_URL, DEFAULT_VISION_MODEL, LOGIN_MAX_ATTEMPTS,
    LOGIN_RETRY_INITIAL_DELAY_MS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Run configuration.
///
/// Parsed from command-line flags and environment variables by `clap`, or
/// built programmatically with struct update syntax over `Config::default()`.
/// Secrets are not part of this struct; see [`crate::config::Credentials`].
///
/// # Examples
///
/// ```bash
/// # Everything from the environment (typical scheduled run)
/// WP_SITE_URL=https://example.com/_wp MWF_POST_TYPE=mwf_285 form_notifier
///
/// # Renamed login page, preview without sending anything
/// form_notifier --site-url https://example.com/_wp --login-path login_09645 \
///     --form-post-type mwf_285 --dry-run
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "form_notifier",
    about = "Pushes new MW WP Form submissions to LINE."
)]
pub struct Config {
    /// WordPress base URL (the directory that contains wp-admin/)
    #[arg(long, env = "WP_SITE_URL")]
    pub site_url: Option<String>,

    /// Login page path relative to the site URL
    #[arg(long, env = "WP_LOGIN_PATH", default_value = DEFAULT_LOGIN_PATH)]
    pub login_path: String,

    /// MW WP Form post type, e.g. mwf_285
    #[arg(long, env = "MWF_POST_TYPE")]
    pub form_post_type: Option<String>,

    /// File holding the highest submission ID already notified
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Directory searched for id_pass.txt and line_config.txt
    #[arg(long, env = "FORM_NOTIFIER_CONFIG_DIR", default_value = ".")]
    pub config_dir: PathBuf,

    /// Chat completions endpoint used to read the CAPTCHA
    #[arg(long, env = "VISION_API_URL", default_value = DEFAULT_VISION_API_URL)]
    pub vision_api_url: String,

    /// Vision model used to read the CAPTCHA
    #[arg(long, env = "VISION_MODEL", default_value = DEFAULT_VISION_MODEL)]
    pub vision_model: String,

    /// LINE push message endpoint
    #[arg(long, env = "PUSH_API_URL", default_value = DEFAULT_PUSH_API_URL)]
    pub push_api_url: String,

    /// Maximum login attempts, each with a fresh CAPTCHA
    #[arg(long, env = "MAX_LOGIN_ATTEMPTS", default_value_t = LOGIN_MAX_ATTEMPTS)]
    pub max_login_attempts: u32,

    /// Delay before the first login retry in milliseconds (doubles per retry)
    #[arg(long, env = "LOGIN_RETRY_DELAY_MS", default_value_t = LOGIN_RETRY_INITIAL_DELAY_MS)]
    pub login_retry_delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Save every fetched CAPTCHA image to this path
    #[arg(long, env = "CAPTCHA_DUMP")]
    pub captcha_dump: Option<PathBuf>,

    /// Save the export page here when it carries no nonce
    #[arg(long, env = "DEBUG_DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Log the messages that would be sent, but do not push them or update the checkpoint
    #[arg(long)]
    pub dry_run: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            form_post_type: None,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            config_dir: PathBuf::from("."),
            vision_api_url: DEFAULT_VISION_API_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            push_api_url: DEFAULT_PUSH_API_URL.to_string(),
            max_login_attempts: LOGIN_MAX_ATTEMPTS,
            login_retry_delay_ms: LOGIN_RETRY_INITIAL_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            captcha_dump: None,
            debug_dir: None,
            dry_run: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
