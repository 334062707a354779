// src/file.rs
//
// Artifact writing. Every file goes to a sibling temp file first and is
// renamed into place, so a failed write never clobbers a good artifact.
// Superseded files are removed only after the new set is complete.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::chunk::ChunkPlan;
use crate::error::{PackError, Result};

/// A file this run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub bytes: u64,
}

/// What `write_plan` left on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<WrittenArtifact>,
    pub removed: Vec<PathBuf>,
}

impl WriteReport {
    pub fn total_bytes(&self) -> u64 {
        self.written.iter().map(|w| w.bytes).sum()
    }
}

/// `{stem}_{index}{.ext}` next to `path`.
pub fn chunk_path(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{index}"),
    };
    path.with_file_name(name)
}

/// Chunk files left by an earlier split: the contiguous run
/// `{stem}_{from}`, `{stem}_{from+1}`, ... that exists on disk. A gap ends
/// the run, so unrelated siblings such as `ial_data_2024.json` are never
/// mistaken for chunks.
pub fn existing_chunks(path: &Path, from: usize) -> Vec<PathBuf> {
    (from.max(1)..)
        .map(|i| chunk_path(path, i))
        .take_while(|p| p.is_file())
        .collect()
}

/// Write `contents` to `path` via a temp file + rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<u64> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let tmp = temp_path(path);
    let wrap = |source: std::io::Error| PackError::Write { path: path.to_path_buf(), source };

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(wrap(e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        wrap(e)
    })?;
    Ok(contents.len() as u64)
}

/// Compact JSON write of any serializable value.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<u64> {
    let bytes = serde_json::to_vec(value)?;
    write_atomic(path, &bytes)
}

/// Persist a chunk plan for the artifact at `path`.
///
/// Single: write `path`, then drop any chunk files left by an earlier split.
/// Chunked: write every chunk, then drop `path` and chunks numbered past the
/// new set.
pub fn write_plan(path: &Path, plan: &ChunkPlan) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    match plan {
        ChunkPlan::Single { payload } => {
            let bytes = write_atomic(path, payload.as_bytes())?;
            logd!("Write: {} ({} bytes)", path.display(), bytes);
            report.written.push(WrittenArtifact { path: path.to_path_buf(), bytes });

            for stale in existing_chunks(path, 1) {
                remove_file(&stale, &mut report)?;
            }
        }
        ChunkPlan::Chunked(chunks) => {
            for chunk in chunks {
                let p = chunk_path(path, chunk.index);
                let bytes = write_atomic(&p, chunk.payload.as_bytes())?;
                logd!("Write: chunk {} ({} bytes)", p.display(), bytes);
                report.written.push(WrittenArtifact { path: p, bytes });
            }

            // all chunks are on disk from here on
            if path.exists() {
                remove_file(path, &mut report)?;
            }
            for stale in existing_chunks(path, chunks.len() + 1) {
                remove_file(&stale, &mut report)?;
            }
        }
    }
    Ok(report)
}

fn remove_file(path: &Path, report: &mut WriteReport) -> Result<()> {
    fs::remove_file(path)?;
    logd!("Write: removed {}", path.display());
    report.removed.push(path.to_path_buf());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(PackError::Write {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        });
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkArtifact;

    fn chunk(index: usize, payload: &str) -> ChunkArtifact {
        ChunkArtifact { index, subjects: vec![format!("S{index}")], payload: payload.into() }
    }

    #[test]
    fn chunk_names() {
        assert_eq!(chunk_path(Path::new("public/cie_IGCSE.json"), 1), PathBuf::from("public/cie_IGCSE_1.json"));
        assert_eq!(chunk_path(Path::new("data"), 12), PathBuf::from("data_12"));
    }

    #[test]
    fn existing_chunks_stop_at_the_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("cie_O_Level.json");
        for name in ["cie_O_Level_1.json", "cie_O_Level_2.json", "cie_O_Level_10.json", "cie_O_Level_x.json", "cie_O_Level.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        assert_eq!(existing_chunks(&base, 1), vec![chunk_path(&base, 1), chunk_path(&base, 2)]);
        assert_eq!(existing_chunks(&base, 2), vec![chunk_path(&base, 2)]);
        assert!(existing_chunks(&base, 3).is_empty());
    }

    #[test]
    fn single_write_keeps_unrelated_numbered_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("ial_data.json");
        let archive = dir.path().join("ial_data_2024.json");
        fs::write(&archive, "[]").unwrap();
        fs::write(chunk_path(&base, 1), "{}").unwrap();

        let plan = ChunkPlan::Single { payload: "{}".into() };
        let report = write_plan(&base, &plan).unwrap();

        assert_eq!(report.removed, vec![chunk_path(&base, 1)]);
        assert_eq!(fs::read_to_string(&archive).unwrap(), "[]");
    }

    #[test]
    fn chunked_write_removes_original_after_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("set.json");
        fs::write(&base, "{\"old\":[]}").unwrap();
        fs::write(chunk_path(&base, 3), "{}").unwrap();

        let plan = ChunkPlan::Chunked(vec![chunk(1, "{\"A\":[]}"), chunk(2, "{\"B\":[]}")]);
        let report = write_plan(&base, &plan).unwrap();

        assert!(!base.exists());
        assert!(!chunk_path(&base, 3).exists());
        assert_eq!(fs::read_to_string(chunk_path(&base, 1)).unwrap(), "{\"A\":[]}");
        assert_eq!(fs::read_to_string(chunk_path(&base, 2)).unwrap(), "{\"B\":[]}");
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.total_bytes(), 16);
    }

    #[test]
    fn single_write_clears_previous_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("set.json");
        fs::write(chunk_path(&base, 1), "{}").unwrap();
        fs::write(chunk_path(&base, 2), "{}").unwrap();

        let plan = ChunkPlan::Single { payload: "{\"A\":[]}".into() };
        let report = write_plan(&base, &plan).unwrap();

        assert_eq!(fs::read_to_string(&base).unwrap(), "{\"A\":[]}");
        assert!(existing_chunks(&base, 1).is_empty());
        assert_eq!(report.removed.len(), 2);
    }

    #[test]
    fn failed_write_keeps_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("set.json");
        fs::write(&base, "good").unwrap();
        // a directory where the temp file should go makes the write fail
        fs::create_dir(dir.path().join("set.json.tmp")).unwrap();

        let err = write_atomic(&base, b"new").unwrap_err();
        assert!(matches!(err, PackError::Write { .. }));
        assert_eq!(fs::read_to_string(&base).unwrap(), "good");
    }
}
