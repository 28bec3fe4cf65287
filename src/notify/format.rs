//! Notification text layout.

use crate::config::{
    MAX_FIELD_VALUE_CHARS, MAX_MESSAGE_CHARS, MAX_PRIORITY_VALUE_CHARS, MESSAGE_HEADER,
    PRIORITY_FIELDS, SKIPPED_FIELDS, TRUNCATED_MESSAGE_CHARS, TRUNCATION_MARKER,
};
use crate::models::Record;
use crate::utils::truncate_chars;

/// Renders an entry as notification text.
///
/// The header line comes first, then the contact fields in a fixed order,
/// then every other non-empty column in CSV order. Bookkeeping columns of
/// the plugin are left out.
pub fn format_record(record: &Record) -> String {
    let mut lines = vec![MESSAGE_HEADER.to_string()];

    for key in PRIORITY_FIELDS {
        if let Some(value) = record.get(key).filter(|v| !v.is_empty()) {
            lines.push(format!(
                "{}: {}",
                key,
                truncate_chars(value, MAX_PRIORITY_VALUE_CHARS)
            ));
        }
    }

    for (key, value) in record.iter() {
        if value.is_empty() || PRIORITY_FIELDS.contains(&key) || SKIPPED_FIELDS.contains(&key) {
            continue;
        }
        lines.push(format!(
            "{}: {}",
            key,
            truncate_chars(value, MAX_FIELD_VALUE_CHARS)
        ));
    }

    lines.join("\n")
}

/// Cuts a message to the LINE text limit, marking the cut with `...`.
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() > MAX_MESSAGE_CHARS {
        format!(
            "{}{}",
            truncate_chars(message, TRUNCATED_MESSAGE_CHARS),
            TRUNCATION_MARKER
        )
    } else {
        message.to_string()
    }
}
