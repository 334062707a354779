// src/clean.rs
//
// Pre-normalization clean stage for flat catalogues: drops the rows the
// source export emits with neither a year nor a session.

use serde_json::Value;

use crate::config::consts::{keys, UNKNOWN_YEAR};
use crate::config::CleanPolicy;
use crate::core::record::RawRecord;

#[derive(Debug, Default)]
pub struct CleanOutcome {
    pub kept: Vec<RawRecord>,
    pub removed: usize,
}

/// First non-null value under any of `keys`, as stored.
fn stored<'a>(raw: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| raw.get(*k)).find(|v| !v.is_null())
}

fn has_unknown_year(raw: &RawRecord) -> bool {
    stored(raw, keys::YEAR).and_then(Value::as_str) == Some(UNKNOWN_YEAR)
}

fn has_empty_session(raw: &RawRecord) -> bool {
    stored(raw, keys::SESSION).and_then(Value::as_str) == Some("")
}

/// Whether `policy` removes this record. Only literal `"Unknown"` years and
/// literal `""` sessions match; absent fields never do.
pub fn should_remove(raw: &RawRecord, policy: CleanPolicy) -> bool {
    match policy {
        CleanPolicy::Both => has_unknown_year(raw) && has_empty_session(raw),
        CleanPolicy::Either => has_unknown_year(raw) || has_empty_session(raw),
    }
}

pub fn clean(records: Vec<RawRecord>, policy: CleanPolicy) -> CleanOutcome {
    let total = records.len();
    let kept: Vec<RawRecord> = records.into_iter().filter(|r| !should_remove(r, policy)).collect();
    CleanOutcome { removed: total - kept.len(), kept }
}
