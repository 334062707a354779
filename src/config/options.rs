// src/config/options.rs
use std::path::{Path, PathBuf};

use super::consts::*;

/// The two source collections. They differ only in how URLs are kept
/// and which key groups the records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DatasetFamily {
    /// Cambridge catalogues: prefix-strippable URLs, exported as bare filenames.
    Cie,
    /// Pearson IAL catalogue: grouped by unit code, URLs exported verbatim.
    Ial,
}

impl DatasetFamily {
    pub fn url_prefix(&self) -> &'static str {
        match self {
            DatasetFamily::Cie => CIE_URL_PREFIX,
            DatasetFamily::Ial => IAL_URL_PREFIX,
        }
    }

    /// Whether exported rows keep the full URL instead of the filename.
    pub fn keeps_full_url(&self) -> bool {
        matches!(self, DatasetFamily::Ial)
    }

    pub fn is_ial(&self) -> bool {
        matches!(self, DatasetFamily::Ial)
    }

    /// Subject key lists in resolution order.
    pub fn subject_keys(&self) -> [&'static [&'static str]; 2] {
        match self {
            DatasetFamily::Cie => [keys::SUBJECT, keys::UNIT_CODE],
            DatasetFamily::Ial => [keys::UNIT_CODE, keys::SUBJECT],
        }
    }

    /// Guess from the file name: anything mentioning "ial" is the IAL catalogue.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.contains("ial") { DatasetFamily::Ial } else { DatasetFamily::Cie }
    }
}

/// Which `Year=Unknown` / `Session=""` combination the clean stage removes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CleanPolicy {
    /// Remove only records where both hold.
    #[default]
    Both,
    /// Remove records where either holds.
    Either,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkBudget {
    /// Upper bound for one chunk artifact, in bytes.
    pub max_chunk_bytes: usize,
    /// Datasets at or below this size are written as one file.
    pub single_file_limit: usize,
}

impl Default for ChunkBudget {
    fn default() -> Self {
        Self {
            max_chunk_bytes: MAX_CHUNK_BYTES,
            single_file_limit: SINGLE_FILE_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackOptions {
    /// Forces the family instead of detecting it per file.
    pub family: Option<DatasetFamily>,
    pub budget: ChunkBudget,
    pub clean_policy: CleanPolicy,
    /// Write artifacts here instead of next to (over) the input.
    pub out_dir: Option<PathBuf>,
    /// File name prefix for per-category catalogues.
    pub split_prefix: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            family: None,
            budget: ChunkBudget::default(),
            clean_policy: CleanPolicy::default(),
            out_dir: None,
            split_prefix: DEFAULT_SPLIT_PREFIX.to_string(),
        }
    }
}

impl PackOptions {
    pub fn family_for(&self, path: &Path, declared: Option<DatasetFamily>) -> DatasetFamily {
        self.family
            .or(declared)
            .unwrap_or_else(|| DatasetFamily::detect(path))
    }

    /// Directory that receives per-category files for `input`.
    pub fn out_dir_for(&self, input: &Path) -> PathBuf {
        match (&self.out_dir, input.parent()) {
            (Some(dir), _) => dir.clone(),
            (None, Some(parent)) => parent.to_path_buf(),
            (None, None) => PathBuf::new(),
        }
    }

    /// Target artifact path for an input file.
    pub fn out_path(&self, input: &Path) -> PathBuf {
        match (&self.out_dir, input.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => input.to_path_buf(),
        }
    }
}
