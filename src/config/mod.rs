// src/config/mod.rs

pub mod consts;
pub mod options;

pub use options::{ChunkBudget, CleanPolicy, DatasetFamily, PackOptions};
