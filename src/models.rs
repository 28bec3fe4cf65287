//! Form entry data model.

use std::collections::BTreeMap;

use crate::config::ID_COLUMN;

/// One form entry: column name to value, in CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

/// All entries of an export, keyed by the `ID` column.
pub type Submissions = BTreeMap<String, Record>;

impl Record {
    /// Creates a record from `(column, value)` pairs.
    ///
    /// A repeated column keeps its first position and its last value.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (k, v) in fields {
            record.insert(k.into(), v.into());
        }
        record
    }

    fn insert(&mut self, key: String, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Value of a column.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `ID` column, if present.
    pub fn id(&self) -> Option<&str> {
        self.get(ID_COLUMN)
    }

    /// The `ID` column as a number.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id().and_then(|id| id.trim().parse().ok())
    }

    /// Columns in CSV order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
