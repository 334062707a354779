// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading, encoding and writing catalogue artifacts.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unrecognised dataset shape in {}: {details}", path.display())]
    Shape { path: PathBuf, details: String },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
