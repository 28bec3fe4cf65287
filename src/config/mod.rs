//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (API endpoints, limits, message layout)
//! - Form field name constants for the WordPress login and export forms
//! - CLI option types and parsing
//! - Credential loading from the environment and fallback files

mod constants;
mod credentials;
mod fields;
mod types;

// Re-export all constants
pub use constants::*;
pub use credentials::Credentials;
pub use fields::*;
pub use types::{Config, LogFormat, LogLevel};
