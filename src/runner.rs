// src/runner.rs
use std::path::{Path, PathBuf};

use crate::{
    chunk,
    clean::clean,
    config::PackOptions,
    core::{
        dict::DictionaryEncoder,
        export::export_grouped,
        group::record_count,
        url::UrlCompactor,
    },
    error::{PackError, Result},
    file::{write_json, write_plan, WrittenArtifact},
    progress::Progress,
    split::{category_path, split_by_category},
    store::{self, Dataset},
};

/// One batch operation over a set of catalogue files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Drop `Year=Unknown` / empty-session rows from flat catalogues.
    Clean,
    /// Break a combined flat catalogue into per-category files.
    Split,
    /// Rewrite as the dictionary-encoded `{subjects, sessions, types, data}` form.
    Compress,
    /// Group by subject, shorten rows and write single or chunked artifacts.
    Optimize,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Clean => "Clean",
            Stage::Split => "Split",
            Stage::Compress => "Compress",
            Stage::Optimize => "Optimize",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Done,
    /// Input did not exist; nothing written.
    Missing,
    /// Input had a shape this stage leaves alone.
    Skipped(String),
    /// Input was unreadable or an artifact could not be written.
    Failed(String),
}

/// Outcome for one input file.
#[derive(Clone, Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub status: FileStatus,
    /// Top-level entries read.
    pub read: usize,
    /// Entries that could not become records (no subject, malformed row, no category).
    pub dropped: usize,
    /// Records removed on purpose by the clean stage.
    pub removed: usize,
    /// Subjects (optimize) or categories (split) produced.
    pub groups: usize,
    pub written: Vec<WrittenArtifact>,
    /// Superseded files deleted after the new artifacts were in place.
    pub deleted: Vec<PathBuf>,
}

impl FileReport {
    fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            status: FileStatus::Done,
            read: 0,
            dropped: 0,
            removed: 0,
            groups: 0,
            written: Vec::new(),
            deleted: Vec::new(),
        }
    }

    fn with_status(input: &Path, status: FileStatus) -> Self {
        Self { status, ..Self::new(input) }
    }

    pub fn written_bytes(&self) -> u64 {
        self.written.iter().map(|w| w.bytes).sum()
    }
}

/// Summary of what was produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub stage: Stage,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn records_read(&self) -> usize {
        self.files.iter().map(|f| f.read).sum()
    }

    pub fn records_dropped(&self) -> usize {
        self.files.iter().map(|f| f.dropped).sum()
    }

    pub fn records_removed(&self) -> usize {
        self.files.iter().map(|f| f.removed).sum()
    }

    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.status, FileStatus::Failed(_))).count()
    }

    pub fn files_written(&self) -> Vec<&Path> {
        self.files.iter().flat_map(|f| f.written.iter().map(|w| w.path.as_path())).collect()
    }
}

/// Run `stage` over every input. Per-file problems are logged and recorded
/// in the summary; they never stop the batch.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    stage: Stage,
    inputs: &[PathBuf],
    opts: &PackOptions,
    mut progress: Option<&mut dyn Progress>,
) -> RunSummary {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(inputs.len());
    }

    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("{} {}...", stage.name(), input.display()));
        }

        let result = match stage {
            Stage::Clean => clean_file(input, opts),
            Stage::Split => split_file(input, opts),
            Stage::Compress => compress_file(input, opts),
            Stage::Optimize => optimize_file(input, opts),
        };

        let report = match result {
            Ok(report) => report,
            Err(PackError::MissingInput(p)) => {
                logw!("{}: file not found: {}", stage.name(), p.display());
                FileReport::with_status(input, FileStatus::Missing)
            }
            Err(e) => {
                loge!("{}: {} abandoned: {}", stage.name(), input.display(), e);
                FileReport::with_status(input, FileStatus::Failed(e.to_string()))
            }
        };

        if let Some(p) = progress.as_deref_mut() {
            p.item_done(input);
        }
        files.push(report);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    RunSummary { stage, files }
}

/* ---------------- Stages ---------------- */

fn skipped(input: &Path, stage: Stage, dataset: &Dataset) -> FileReport {
    let why = format!("{} input is not handled by {}", dataset.kind(), stage.name().to_lowercase());
    logw!("{}: skipping {}: {}", stage.name(), input.display(), why);
    FileReport {
        read: dataset.raw_len(),
        ..FileReport::with_status(input, FileStatus::Skipped(why))
    }
}

pub fn clean_file(input: &Path, opts: &PackOptions) -> Result<FileReport> {
    let dataset = store::load(input)?;
    let (records, malformed) = match dataset {
        Dataset::Flat { records, malformed } => (records, malformed),
        other => return Ok(skipped(input, Stage::Clean, &other)),
    };

    let mut report = FileReport::new(input);
    report.read = records.len() + malformed;
    report.dropped = malformed;

    let outcome = clean(records, opts.clean_policy);
    report.removed = outcome.removed;

    let out = opts.out_path(input);
    let bytes = write_json(&out, &outcome.kept)?;
    report.written.push(WrittenArtifact { path: out, bytes });

    logf!("Clean: removed {} of {} records from {}", report.removed, report.read, input.display());
    Ok(report)
}

pub fn split_file(input: &Path, opts: &PackOptions) -> Result<FileReport> {
    let dataset = store::load(input)?;
    let (records, malformed) = match dataset {
        Dataset::Flat { records, malformed } => (records, malformed),
        other => return Ok(skipped(input, Stage::Split, &other)),
    };

    let mut report = FileReport::new(input);
    report.read = records.len() + malformed;

    let split = split_by_category(records);
    report.dropped = malformed + split.uncategorized;
    report.groups = split.by_category.len();

    let dir = opts.out_dir_for(input);
    for (category, rows) in &split.by_category {
        let path = category_path(&dir, &opts.split_prefix, category);
        let bytes = write_json(&path, rows)?;
        logf!("Split: {} records → {}", rows.len(), path.display());
        report.written.push(WrittenArtifact { path, bytes });
    }
    Ok(report)
}

pub fn compress_file(input: &Path, opts: &PackOptions) -> Result<FileReport> {
    let dataset = store::load(input)?;
    if matches!(dataset, Dataset::Grouped) {
        return Ok(skipped(input, Stage::Compress, &dataset));
    }

    let mut report = FileReport::new(input);
    report.read = dataset.raw_len();

    let family = opts.family_for(input, dataset.declared_family());
    let normalized = dataset.into_records(input, family)?;
    report.dropped = normalized.dropped;

    let mut encoder = DictionaryEncoder::new(UrlCompactor::new(family.url_prefix()));
    let rows = encoder.encode_all(&normalized.records);
    let doc = encoder.to_compressed(&rows, family.is_ial())?;

    let out = opts.out_path(input);
    let bytes = write_json(&out, &doc)?;
    report.groups = encoder.subjects.len();
    report.written.push(WrittenArtifact { path: out, bytes });

    logf!(
        "Compress: {} records, {} subjects, {} sessions, {} types ({:?})",
        rows.len(),
        encoder.subjects.len(),
        encoder.sessions.len(),
        encoder.types.len(),
        family
    );
    Ok(report)
}

pub fn optimize_file(input: &Path, opts: &PackOptions) -> Result<FileReport> {
    let dataset = store::load(input)?;
    if matches!(dataset, Dataset::Grouped) {
        return Ok(skipped(input, Stage::Optimize, &dataset));
    }

    let mut report = FileReport::new(input);
    report.read = dataset.raw_len();

    let family = opts.family_for(input, dataset.declared_family());
    let normalized = dataset.into_records(input, family)?;
    report.dropped = normalized.dropped;

    let mut encoder = DictionaryEncoder::new(UrlCompactor::new(family.url_prefix()));
    let rows = encoder.encode_all(&normalized.records);
    let grouped = export_grouped(&encoder, rows, family);
    report.groups = grouped.len();
    logd!("Optimize: {} records in {} subjects", record_count(&grouped), grouped.len());

    let plan = chunk::plan(&grouped, &opts.budget)?;
    let out = opts.out_path(input);
    let written = write_plan(&out, &plan)?;

    logf!(
        "Optimize: {} → {} artifact(s), {:.2} MB",
        input.display(),
        written.written.len(),
        written.total_bytes() as f64 / (1024.0 * 1024.0)
    );
    report.written = written.written;
    report.deleted = written.removed;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use std::fs;

    #[test]
    fn missing_inputs_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("cie_IGCSE.json");
        fs::write(&good, r#"[{"Subject":"Physics","Year":2020,"Session":"June","Type":"qp","URL":"x/a_12.pdf"}]"#).unwrap();
        let missing = dir.path().join("cie_O_Level.json");
        let corrupt = dir.path().join("cie_AS_and_A_Level.json");
        fs::write(&corrupt, "[{").unwrap();

        let mut progress = NullProgress;
        let summary = run(
            Stage::Optimize,
            &[missing.clone(), corrupt.clone(), good.clone()],
            &PackOptions::default(),
            Some(&mut progress),
        );

        assert_eq!(summary.files[0].status, FileStatus::Missing);
        assert!(matches!(summary.files[1].status, FileStatus::Failed(_)));
        assert_eq!(summary.files[2].status, FileStatus::Done);
        assert_eq!(summary.failures(), 1);
        assert_eq!(summary.records_read(), 1);
        assert_eq!(fs::read_to_string(&good).unwrap(), r#"{"Physics":[[20,6,"qp","12","a_12.pdf"]]}"#);
        // corrupt input is left untouched
        assert_eq!(fs::read_to_string(&corrupt).unwrap(), "[{");
    }

    #[test]
    fn optimized_files_are_skipped_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let done = dir.path().join("cie_IGCSE.json");
        fs::write(&done, r#"{"Physics":[[20,6,"qp",null,"a.pdf"]]}"#).unwrap();

        let summary = run(Stage::Optimize, &[done.clone()], &PackOptions::default(), None);
        assert!(matches!(summary.files[0].status, FileStatus::Skipped(_)));
        assert_eq!(summary.failures(), 0);
    }

    #[test]
    fn clean_skips_compressed_input() {
        let dir = tempfile::tempdir().unwrap();
        let comp = dir.path().join("c.json");
        fs::write(&comp, r#"{"subjects":[],"data":[]}"#).unwrap();
        let summary = run(Stage::Clean, &[comp], &PackOptions::default(), None);
        assert!(matches!(summary.files[0].status, FileStatus::Skipped(_)));
    }
}
