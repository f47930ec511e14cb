//! Submission: the validated snapshot of a form at submit time.

use chrono::{NaiveDate, NaiveTime};

use crate::core::key::build_key;

/// A complete, validated form submission.
///
/// Only built by [`crate::core::FormCollector::validate`]; lives just long
/// enough to derive a key and upload the audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// (field key, selected value) in display order
    pub field_values: Vec<(String, String)>,
    pub date: NaiveDate,
    pub time: NaiveTime,

    /// Raw WAV bytes
    pub audio: Vec<u8>,
}

impl Submission {
    /// Selected value for a field key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field_values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Object key under `storage_prefix`
    pub fn object_key(&self, storage_prefix: &str) -> String {
        let values: Vec<&str> = self.field_values.iter().map(|(_, v)| v.as_str()).collect();
        build_key(storage_prefix, &values, self.date, self.time)
    }
}
