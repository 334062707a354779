// src/core/record.rs
//! Canonical record shape and the normalizer that produces it.
//!
//! Source catalogues went through several rounds of key renaming, so a raw
//! record may say `Subject` or `S`, `URL` or `u`, and so on. Every logical
//! field is resolved through an explicit precedence list (see
//! `config::consts::keys`): the short key wins, the verbose key is the
//! fallback. The subject additionally falls back to the unit code, which is
//! the primary key for the IAL family.
//!
//! Normalization never fails. Unparseable years become `Year::Unknown`,
//! unknown document types become `DocType::Other`, and a record without a
//! subject is dropped and counted by the caller.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::consts::{keys, UNKNOWN_YEAR};
use crate::config::DatasetFamily;
use crate::core::sanitize::clean_subject;

/// A record exactly as read from a flat catalogue.
pub type RawRecord = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Year {
    Known(i64),
    /// Explicit sentinel for missing or unparseable years.
    Unknown,
}

impl Year {
    pub fn from_value(v: Option<&Value>) -> Self {
        match v {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Year::Known(i)
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() && f.fract() == 0.0 => Year::Known(f as i64),
                        _ => Year::Unknown,
                    }
                }
            }
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Year::Known).unwrap_or(Year::Unknown),
            _ => Year::Unknown,
        }
    }

    /// Two-digit form used by exported rows; 0 when unknown.
    pub fn short(&self) -> u8 {
        match *self {
            Year::Known(y) if y > 0 => (y % 100) as u8,
            _ => 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Year::Unknown)
    }
}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Year::Known(y) => serializer.serialize_i64(y),
            Year::Unknown => serializer.serialize_str(UNKNOWN_YEAR),
        }
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Option::<Value>::deserialize(deserializer)?;
        Ok(Year::from_value(v.as_ref()))
    }
}

/// Document category codes. `Other` is the explicit fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DocType {
    QuestionPaper,
    MarkScheme,
    ExaminerReport,
    GradeThresholds,
    Insert,
    ConfidentialInstructions,
    #[default]
    Other,
}

impl DocType {
    pub const ALL: [DocType; 7] = [
        DocType::QuestionPaper,
        DocType::MarkScheme,
        DocType::ExaminerReport,
        DocType::GradeThresholds,
        DocType::Insert,
        DocType::ConfidentialInstructions,
        DocType::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DocType::QuestionPaper => "qp",
            DocType::MarkScheme => "ms",
            DocType::ExaminerReport => "er",
            DocType::GradeThresholds => "gt",
            DocType::Insert => "insert",
            DocType::ConfidentialInstructions => "ci",
            DocType::Other => "other",
        }
    }

    pub fn verbose(&self) -> &'static str {
        match self {
            DocType::QuestionPaper => "Question Paper",
            DocType::MarkScheme => "Mark Scheme",
            DocType::ExaminerReport => "Examiner Report",
            DocType::GradeThresholds => "Grade Thresholds",
            DocType::Insert => "Insert",
            DocType::ConfidentialInstructions => "Confidential Instructions",
            DocType::Other => "Other",
        }
    }

    /// Case-insensitive lookup of verbose names and codes, then a phrase
    /// search for free-text titles. Anything else is `Other`.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if let Some(found) = Self::ALL
            .iter()
            .find(|d| t.eq_ignore_ascii_case(d.verbose()) || t.eq_ignore_ascii_case(d.code()))
        {
            return *found;
        }

        let lower = t.to_ascii_lowercase();
        [
            DocType::QuestionPaper,
            DocType::MarkScheme,
            DocType::ExaminerReport,
            DocType::GradeThresholds,
        ]
        .into_iter()
        .find(|d| lower.contains(&d.verbose().to_ascii_lowercase()))
        .unwrap_or(DocType::Other)
    }
}

impl Serialize for DocType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DocType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Option::<String>::deserialize(deserializer)?;
        Ok(v.as_deref().map(DocType::parse).unwrap_or_default())
    }
}

/// Which source field the secondary descriptor came from.
/// `Unknown` once it has been through the positional format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraKind {
    Unit,
    Component,
    Title,
    Unknown,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Extra {
    pub kind: ExtraKind,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalRecord {
    pub subject: String,
    pub year: Year,
    pub session: String,
    pub doc_type: DocType,
    pub url: String,
    pub extra: Option<Extra>,
}

impl CanonicalRecord {
    /// Component text, only when the descriptor is known to be one.
    pub fn component(&self) -> Option<String> {
        match &self.extra {
            Some(Extra { kind: ExtraKind::Component, value }) => value_text(value),
            _ => None,
        }
    }
}

/// Result of normalizing a batch.
#[derive(Debug, Default)]
pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    /// Records dropped for lack of a subject.
    pub dropped: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    family: DatasetFamily,
}

impl Normalizer {
    pub fn new(family: DatasetFamily) -> Self {
        Self { family }
    }

    pub fn family(&self) -> DatasetFamily {
        self.family
    }

    /// Map one raw record onto the canonical shape. `None` means drop.
    pub fn normalize(&self, raw: &RawRecord) -> Option<CanonicalRecord> {
        let subject = self
            .family
            .subject_keys()
            .iter()
            .find_map(|ks| resolve(raw, ks))
            .and_then(value_text)
            .map(|s| clean_subject(&s))
            .filter(|s| !s.is_empty())?;

        let year = Year::from_value(resolve(raw, keys::YEAR));
        let session = resolve(raw, keys::SESSION).and_then(value_text).unwrap_or_default();
        let doc_type = resolve(raw, keys::TYPE)
            .and_then(value_text)
            .map(|t| DocType::parse(&t))
            .unwrap_or_default();
        let url = resolve(raw, keys::URL).and_then(value_text).unwrap_or_default();

        let extra = [
            (keys::UNIT, ExtraKind::Unit),
            (keys::COMPONENT, ExtraKind::Component),
            (keys::TITLE, ExtraKind::Title),
        ]
        .into_iter()
        .find_map(|(ks, kind)| resolve(raw, ks).map(|v| Extra { kind, value: v.clone() }));

        Some(CanonicalRecord { subject, year, session, doc_type, url, extra })
    }

    pub fn normalize_all<'a, I>(&self, raws: I) -> Normalized
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut out = Normalized::default();
        for raw in raws {
            match self.normalize(raw) {
                Some(rec) => out.records.push(rec),
                None => out.dropped += 1,
            }
        }
        out
    }
}

/// First present value among `keys`. Null and `""` count as absent.
pub fn resolve<'a>(raw: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| is_present(v))
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Scalar → text. Arrays and objects have no text form.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
