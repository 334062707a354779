// src/core/export.rs
//
// Final per-record shape served to the browser:
//   [yearShort, sessionCode, docType, component, urlOrFilename]

use serde::{Deserialize, Serialize};

use crate::config::consts::SESSION_MONTHS;
use crate::config::DatasetFamily;
use crate::core::dict::{DictionaryEncoder, EncodedRecord};
use crate::core::group::{group_by, GroupedDataset};
use crate::core::record::{CanonicalRecord, DocType};
use crate::core::url::{component_from_file_name, file_name};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow(
    pub u8,
    pub u8,
    pub DocType,
    pub Option<String>,
    pub String,
);

/// Month number for a session label, 0 when unmapped.
pub fn session_code(session: &str) -> u8 {
    SESSION_MONTHS
        .iter()
        .find(|(label, _)| *label == session)
        .map(|(_, m)| *m)
        .unwrap_or(0)
}

impl ExportRow {
    pub fn from_record(rec: &CanonicalRecord, family: DatasetFamily) -> Self {
        let name = file_name(&rec.url);
        let component = rec.component().or_else(|| component_from_file_name(name));
        let url = if family.keeps_full_url() { rec.url.clone() } else { name.to_string() };

        ExportRow(rec.year.short(), session_code(&rec.session), rec.doc_type, component, url)
    }
}

/// Group encoded rows by subject and resolve them into export rows.
/// Rows the encoder cannot decode are skipped; the encoder produced them,
/// so that only happens for foreign rows.
pub fn export_grouped(
    encoder: &DictionaryEncoder,
    rows: Vec<EncodedRecord>,
    family: DatasetFamily,
) -> GroupedDataset<ExportRow> {
    let decoded = rows.iter().filter_map(|r| encoder.decode(r));
    let grouped = group_by(decoded, |rec| rec.subject.clone());

    grouped
        .into_iter()
        .map(|(subject, recs)| {
            let out = recs.iter().map(|r| ExportRow::from_record(r, family)).collect();
            (subject, out)
        })
        .collect()
}
