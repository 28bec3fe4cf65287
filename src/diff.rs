//! New-entry detection against the checkpoint.

use log::warn;

use crate::models::{Record, Submissions};

/// Entries newer than the checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<'a> {
    /// Entries with an ID above the checkpoint, newest first
    pub new_records: Vec<(u64, &'a Record)>,
    /// Highest ID across all entries; `None` if no entry has a numeric ID
    pub new_max_id: Option<u64>,
}

/// Compares entries against the last checkpoint.
///
/// IDs that are not non-negative integers are skipped with a warning.
pub fn diff(submissions: &Submissions, last_max_id: u64) -> Diff<'_> {
    let mut new_max_id = None;
    let mut new_records = Vec::new();

    for (id, record) in submissions {
        let Some(numeric) = record.numeric_id() else {
            warn!("Ignoring entry with non-numeric ID {:?}", id);
            continue;
        };
        new_max_id = new_max_id.max(Some(numeric));
        if numeric > last_max_id {
            new_records.push((numeric, record));
        }
    }

    new_records.sort_by(|a, b| b.0.cmp(&a.0));

    Diff {
        new_records,
        new_max_id,
    }
}
