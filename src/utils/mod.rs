//! Shared helpers.
//!
//! This module provides:
//! - Character-based truncation for message fields and diagnostics
//! - CSS selector parsing for the HTML scrapers

mod selector;
mod text;

pub use selector::parse_selector_unsafe;
pub use text::{preview, truncate_chars};
