// src/core/mod.rs

pub mod dict;
pub mod export;
pub mod group;
pub mod record;
pub mod sanitize;
pub mod url;

pub use dict::{DictionaryEncoder, DictionaryTable, EncodedRecord};
pub use group::GroupedDataset;
pub use record::{CanonicalRecord, DocType, Normalizer, Year};
