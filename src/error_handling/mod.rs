//! Error types and retry policy.
//!
//! This module provides:
//! - One error enum per pipeline stage (login, CAPTCHA, export, notification,
//!   checkpoint) plus the run-level [`CheckError`]
//! - The login retry strategy and the transient/permanent split that drives it
//!
//! Every pipeline failure ends the run early with a diagnostic; none of them
//! make the process exit with a failure code.

mod retry;
mod types;

// Re-export public API
pub use retry::{get_login_retry_strategy, is_transient_http_error};
pub use types::{
    CaptchaError, CheckError, CheckpointError, ExportError, InitializationError, LoginError,
    NotifyError,
};
