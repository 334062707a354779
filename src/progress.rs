// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting for batch stages.
/// The CLI implements this to print status lines; library callers can ignore it.
pub trait Progress {
    /// Called at the start with the number of input files.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one input file has been handled (successfully or not).
    fn item_done(&mut self, _path: &Path) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
