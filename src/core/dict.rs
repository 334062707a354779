// src/core/dict.rs
//! Dictionary encoding of the repetitive categorical fields.
//!
//! Subjects, session labels and type codes repeat thousands of times in a
//! catalogue. Each gets a `DictionaryTable` that hands out 0-based indexes
//! in first-seen order; records are rewritten as positional
//! `[subject, year, session, type, url, extra]` rows referencing them.
//!
//! The encoder belongs to one run. Indexes are never reassigned, so encoding
//! the same input twice gives identical tables and rows.

use std::collections::HashMap;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::core::record::{CanonicalRecord, DocType, Extra, ExtraKind, Year};
use crate::core::url::UrlCompactor;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictionaryTable {
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl DictionaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored value list. Later duplicates keep the first index.
    pub fn from_values(values: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            index.entry(v.clone()).or_insert(i);
        }
        Self { values, index }
    }

    /// Index of `value`, appending it on first sight.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(&i) = self.index.get(value) {
            return i;
        }
        let i = self.values.len();
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), i);
        i
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.values.get(i).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Positional form of a record. Serialized as a 6-element array.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedRecord {
    pub subject: usize,
    pub year: Year,
    pub session: usize,
    pub doc_type: usize,
    pub url: String,
    /// Only the value is serialized; the kind survives while the row is in memory.
    pub extra: Option<Extra>,
}

impl Serialize for EncodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(6)?;
        t.serialize_element(&self.subject)?;
        t.serialize_element(&self.year)?;
        t.serialize_element(&self.session)?;
        t.serialize_element(&self.doc_type)?;
        t.serialize_element(&self.url)?;
        t.serialize_element(&self.extra.as_ref().map(|e| &e.value))?;
        t.end()
    }
}

impl EncodedRecord {
    /// Lenient read of a stored row. Short rows, non-integer indexes or a
    /// non-array value give `None`; a missing url or extra is tolerated.
    pub fn from_row(row: &Value) -> Option<Self> {
        let cells = row.as_array()?;
        let idx = |i: usize| cells.get(i).and_then(Value::as_u64).map(|n| n as usize);

        Some(Self {
            subject: idx(0)?,
            year: Year::from_value(cells.get(1)),
            session: idx(2)?,
            doc_type: idx(3)?,
            url: cells.get(4).and_then(Value::as_str).unwrap_or_default().to_string(),
            extra: cells
                .get(5)
                .filter(|v| !v.is_null())
                .map(|v| Extra { kind: ExtraKind::Unknown, value: v.clone() }),
        })
    }
}

/// On-disk compressed catalogue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompressedDataset {
    pub subjects: Vec<Option<String>>,
    #[serde(default)]
    pub sessions: Vec<Option<String>>,
    #[serde(default)]
    pub types: Vec<Option<String>>,
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ial: Option<bool>,
}

/// Owns the three tables for one run.
#[derive(Clone, Debug)]
pub struct DictionaryEncoder {
    pub subjects: DictionaryTable,
    pub sessions: DictionaryTable,
    pub types: DictionaryTable,
    urls: UrlCompactor,
}

impl DictionaryEncoder {
    pub fn new(urls: UrlCompactor) -> Self {
        Self {
            subjects: DictionaryTable::new(),
            sessions: DictionaryTable::new(),
            types: DictionaryTable::new(),
            urls,
        }
    }

    pub fn encode(&mut self, rec: &CanonicalRecord) -> EncodedRecord {
        EncodedRecord {
            subject: self.subjects.intern(&rec.subject),
            year: rec.year,
            session: self.sessions.intern(&rec.session),
            doc_type: self.types.intern(rec.doc_type.code()),
            url: self.urls.strip(&rec.url).to_string(),
            extra: rec.extra.clone(),
        }
    }

    pub fn encode_all(&mut self, recs: &[CanonicalRecord]) -> Vec<EncodedRecord> {
        recs.iter().map(|r| self.encode(r)).collect()
    }

    /// Resolve a row back through the tables. An unknown subject index is
    /// unrecoverable; unknown session/type indexes fall back to `""`/other.
    pub fn decode(&self, row: &EncodedRecord) -> Option<CanonicalRecord> {
        let subject = self.subjects.get(row.subject)?.to_string();
        let session = self.sessions.get(row.session).unwrap_or_default().to_string();
        let doc_type = self.types.get(row.doc_type).map(DocType::parse).unwrap_or_default();

        Some(CanonicalRecord {
            subject,
            year: row.year,
            session,
            doc_type,
            url: self.urls.restore(&row.url),
            extra: row.extra.clone(),
        })
    }

    pub fn to_compressed(
        &self,
        rows: &[EncodedRecord],
        is_ial: bool,
    ) -> crate::error::Result<CompressedDataset> {
        let data = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let some = |t: &DictionaryTable| -> Vec<Option<String>> {
            t.values().iter().cloned().map(Some).collect()
        };

        Ok(CompressedDataset {
            subjects: some(&self.subjects),
            sessions: some(&self.sessions),
            types: some(&self.types),
            data,
            is_ial: Some(is_ial),
        })
    }
}

/// Rows decoded out of a compressed document.
#[derive(Debug, Default)]
pub struct Decoded {
    pub records: Vec<CanonicalRecord>,
    /// Malformed rows plus rows whose subject is missing or out of range.
    pub dropped: usize,
}

impl CompressedDataset {
    pub fn decode(&self, urls: UrlCompactor) -> Decoded {
        let text = |col: &[Option<String>]| -> Vec<String> {
            col.iter().map(|v| v.clone().unwrap_or_default()).collect()
        };
        let encoder = DictionaryEncoder {
            subjects: DictionaryTable::from_values(text(&self.subjects)),
            sessions: DictionaryTable::from_values(text(&self.sessions)),
            types: DictionaryTable::from_values(text(&self.types)),
            urls,
        };

        let mut out = Decoded::default();
        for row in &self.data {
            let rec = EncodedRecord::from_row(row)
                .and_then(|r| encoder.decode(&r))
                .filter(|r| !r.subject.is_empty());
            match rec {
                Some(r) => out.records.push(r),
                None => out.dropped += 1,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetFamily;
    use crate::core::record::{Normalizer, RawRecord};
    use serde_json::json;

    fn raw(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    fn physics() -> CanonicalRecord {
        Normalizer::new(DatasetFamily::Cie)
            .normalize(&raw(json!({
                "Subject": "Physics", "Year": 2020, "Session": "June",
                "Type": "Question Paper", "URL": "http://x/Physics_2020_June_qp.pdf"
            })))
            .unwrap()
    }

    #[test]
    fn physics_scenario_encodes_to_first_indexes() {
        let mut enc = DictionaryEncoder::new(UrlCompactor::new("http://x/"));
        let row = enc.encode(&physics());
        assert_eq!(enc.subjects.values(), ["Physics"]);
        assert_eq!(enc.subjects.index_of("Physics"), Some(0));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"[0,2020,0,0,"Physics_2020_June_qp.pdf",null]"#
        );
    }

    #[test]
    fn tables_assign_first_seen_indexes() {
        let mut t = DictionaryTable::new();
        assert_eq!(t.intern("June"), 0);
        assert_eq!(t.intern("March"), 1);
        assert_eq!(t.intern("June"), 0);
        assert_eq!(t.intern(""), 2);
        assert_eq!(t.values(), ["June", "March", ""]);
    }

    #[test]
    fn decode_reverses_encode() {
        let n = Normalizer::new(DatasetFamily::Cie);
        let raws = vec![
            raw(json!({"Subject": "Physics", "Year": 2020, "Session": "June", "Type": "qp",
                       "URL": "http://x/p1.pdf", "Component": "12"})),
            raw(json!({"Subject": "Biology", "Year": "Unknown", "Session": "",
                       "URL": "https://elsewhere/b.pdf", "Unit": 9700.0})),
            raw(json!({"Subject": "Physics", "Year": 2019, "Session": "Oct/Nov", "Type": "Mark Scheme",
                       "URL": "http://x/p2.pdf", "Title": "Paper 2"})),
        ];
        let recs = n.normalize_all(&raws).records;

        let mut enc = DictionaryEncoder::new(UrlCompactor::new("http://x/"));
        let rows = enc.encode_all(&recs);
        assert_eq!(rows[0].url, "p1.pdf");
        assert_eq!(rows[1].url, "https://elsewhere/b.pdf");

        for (orig, row) in recs.iter().zip(&rows) {
            let back = enc.decode(row).unwrap();
            assert_eq!(back.subject, orig.subject);
            assert_eq!(back.year, orig.year);
            assert_eq!(back.session, orig.session);
            assert_eq!(back.doc_type, orig.doc_type);
            assert_eq!(back.url, orig.url);
            assert_eq!(back.extra.map(|e| e.value), orig.extra.clone().map(|e| e.value));
        }
    }

    #[test]
    fn extra_kind_survives_in_memory_but_not_on_disk() {
        let n = Normalizer::new(DatasetFamily::Cie);
        let rec = n
            .normalize(&raw(json!({"Subject": "P", "Component": "22", "URL": "http://x/p.pdf"})))
            .unwrap();
        let mut enc = DictionaryEncoder::new(UrlCompactor::new("http://x/"));
        let row = enc.encode(&rec);
        assert_eq!(enc.decode(&row).unwrap().component().as_deref(), Some("22"));

        let stored = serde_json::to_value(&row).unwrap();
        assert_eq!(stored[5], json!("22"));
        let reread = EncodedRecord::from_row(&stored).unwrap();
        assert_eq!(reread.extra.map(|e| e.kind), Some(ExtraKind::Unknown));
    }

    #[test]
    fn encoding_twice_is_stable() {
        let recs = vec![physics(), physics()];
        let mut a = DictionaryEncoder::new(UrlCompactor::new("http://x/"));
        let mut b = DictionaryEncoder::new(UrlCompactor::new("http://x/"));
        assert_eq!(a.encode_all(&recs), b.encode_all(&recs));
        assert_eq!(a.subjects, b.subjects);
        assert_eq!(a.sessions, b.sessions);
        assert_eq!(a.types, b.types);
    }

    #[test]
    fn compressed_document_decodes_leniently() {
        let doc: CompressedDataset = serde_json::from_value(json!({
            "subjects": ["Physics", null],
            "sessions": ["June"],
            "types": ["qp"],
            "data": [
                [0, 2020, 0, 0, "a.pdf", null],
                [0, "Unknown", 7, 9, "b.pdf"],
                [1, 2020, 0, 0, "c.pdf", null],
                [5, 2020, 0, 0, "d.pdf", null],
                "garbage",
                [0, 2020]
            ]
        }))
        .unwrap();
        assert_eq!(doc.is_ial, None);

        let out = doc.decode(UrlCompactor::new("http://x/"));
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.dropped, 4);
        assert_eq!(out.records[0].url, "http://x/a.pdf");
        assert_eq!(out.records[1].session, "");
        assert_eq!(out.records[1].doc_type, DocType::Other);
        assert!(out.records[1].year.is_unknown());
    }
}
