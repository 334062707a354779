// src/store.rs
//! Reading catalogue files and telling their shapes apart.
//!
//! A catalogue on disk is one of:
//! - a flat JSON array of records (any key naming scheme);
//! - a compressed document `{subjects, sessions, types, data, is_ial}`;
//! - an already-optimized `{subject: [rows]}` mapping.
//!
//! Detection looks only at the top level: arrays are flat, objects with a
//! `subjects` key are compressed, any other object is optimized output.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::DatasetFamily;
use crate::core::dict::CompressedDataset;
use crate::core::record::{Normalized, Normalizer, RawRecord};
use crate::core::url::UrlCompactor;
use crate::error::{PackError, Result};

#[derive(Clone, Debug)]
pub enum Dataset {
    Flat {
        records: Vec<RawRecord>,
        /// Array entries that were not JSON objects.
        malformed: usize,
    },
    Compressed(CompressedDataset),
    Grouped,
}

impl Dataset {
    pub fn kind(&self) -> &'static str {
        match self {
            Dataset::Flat { .. } => "flat",
            Dataset::Compressed(_) => "compressed",
            Dataset::Grouped => "grouped",
        }
    }

    /// Family recorded inside the document, if any.
    pub fn declared_family(&self) -> Option<DatasetFamily> {
        match self {
            Dataset::Compressed(doc) => doc.is_ial.map(|ial| {
                if ial { DatasetFamily::Ial } else { DatasetFamily::Cie }
            }),
            _ => None,
        }
    }

    /// Number of top-level entries as read.
    pub fn raw_len(&self) -> usize {
        match self {
            Dataset::Flat { records, malformed } => records.len() + malformed,
            Dataset::Compressed(doc) => doc.data.len(),
            Dataset::Grouped => 0,
        }
    }

    /// Canonical records for either record-bearing shape.
    /// Optimized output cannot be turned back into records.
    pub fn into_records(self, path: &Path, family: DatasetFamily) -> Result<Normalized> {
        match self {
            Dataset::Flat { records, malformed } => {
                let mut out = Normalizer::new(family).normalize_all(&records);
                out.dropped += malformed;
                Ok(out)
            }
            Dataset::Compressed(doc) => {
                let decoded = doc.decode(UrlCompactor::new(family.url_prefix()));
                Ok(Normalized { records: decoded.records, dropped: decoded.dropped })
            }
            Dataset::Grouped => Err(PackError::Shape {
                path: path.to_path_buf(),
                details: "already optimized (subject → rows mapping)".into(),
            }),
        }
    }
}

/// Read and classify one catalogue file.
pub fn load(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(PackError::MissingInput(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let parse_err = |source: serde_json::Error| PackError::Parse { path: path.to_path_buf(), source };
    let value: Value = serde_json::from_str(&text).map_err(parse_err)?;

    let dataset = match value {
        Value::Array(items) => {
            let total = items.len();
            let records: Vec<RawRecord> = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(m) => Some(m),
                    _ => None,
                })
                .collect();
            let malformed = total - records.len();
            Dataset::Flat { records, malformed }
        }
        Value::Object(map) if map.contains_key("subjects") => {
            let doc: CompressedDataset =
                serde_json::from_value(Value::Object(map)).map_err(parse_err)?;
            Dataset::Compressed(doc)
        }
        Value::Object(_) => Dataset::Grouped,
        other => {
            return Err(PackError::Shape {
                path: path.to_path_buf(),
                details: format!("top-level {} is neither a list nor an object", type_name(&other)),
            });
        }
    };

    logd!("Load: {} is {} ({} entries)", path.display(), dataset.kind(), dataset.raw_len());
    Ok(dataset)
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
