// src/chunk.rs
//! Size-bounded splitting of a grouped dataset.
//!
//! A dataset whose compact JSON fits under `single_file_limit` is written as
//! one artifact. Anything larger is packed greedily into chunks of at most
//! `max_chunk_bytes`:
//!
//! - subjects are visited in byte-lexicographic order, so boundaries depend
//!   only on the data and the budget;
//! - a subject's contribution is the size of `{"subject":[...]}` on its own;
//! - a chunk is closed when the next subject would push it over budget;
//! - a subject is never split, so one oversized subject gets a chunk to itself.
//!
//! Chunks are numbered from 1 in packing order.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::ChunkBudget;
use crate::core::group::GroupedDataset;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkArtifact {
    /// 1-based position in the chunk set.
    pub index: usize,
    pub subjects: Vec<String>,
    /// Compact JSON of this chunk's subject → records mapping.
    pub payload: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkPlan {
    Single { payload: String },
    Chunked(Vec<ChunkArtifact>),
}

impl ChunkPlan {
    pub fn artifact_count(&self) -> usize {
        match self {
            ChunkPlan::Single { .. } => 1,
            ChunkPlan::Chunked(chunks) => chunks.len(),
        }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self, ChunkPlan::Chunked(_))
    }
}

/// Decide between one artifact and a chunk set.
pub fn plan<T: Serialize>(grouped: &GroupedDataset<T>, budget: &ChunkBudget) -> Result<ChunkPlan> {
    let whole = serde_json::to_string(grouped)?;
    logd!("Chunk: whole dataset {} bytes ({} subjects)", whole.len(), grouped.len());

    if whole.len() <= budget.single_file_limit {
        return Ok(ChunkPlan::Single { payload: whole });
    }
    Ok(ChunkPlan::Chunked(split(grouped, budget.max_chunk_bytes)?))
}

/// Greedy packing into chunks of at most `max_bytes` (soft for single
/// oversized subjects).
pub fn split<T: Serialize>(grouped: &GroupedDataset<T>, max_bytes: usize) -> Result<Vec<ChunkArtifact>> {
    let mut subjects: Vec<&String> = grouped.keys().collect();
    subjects.sort();

    let mut chunks = Vec::new();
    let mut current: IndexMap<&str, &Vec<T>> = IndexMap::new();
    let mut current_size = 0usize;

    for subject in subjects {
        let records = &grouped[subject.as_str()];
        let size = entry_size(subject, records)?;

        if !current.is_empty() && current_size + size > max_bytes {
            chunks.push(close_chunk(chunks.len() + 1, &current)?);
            current.clear();
            current_size = 0;
        }
        if size > max_bytes {
            logw!("Chunk: subject '{}' alone is {} bytes (budget {})", subject, size, max_bytes);
        }

        current.insert(subject.as_str(), records);
        current_size += size;
    }

    if !current.is_empty() {
        chunks.push(close_chunk(chunks.len() + 1, &current)?);
    }
    Ok(chunks)
}

/// Size of `{subject: records}` serialized on its own.
fn entry_size<T: Serialize>(subject: &str, records: &Vec<T>) -> Result<usize> {
    let mut single: IndexMap<&str, &Vec<T>> = IndexMap::with_capacity(1);
    single.insert(subject, records);
    Ok(serde_json::to_vec(&single)?.len())
}

fn close_chunk<T: Serialize>(index: usize, entries: &IndexMap<&str, &Vec<T>>) -> Result<ChunkArtifact> {
    let payload = serde_json::to_string(entries)?;
    logd!("Chunk: #{} holds {} subjects, {} bytes", index, entries.len(), payload.len());
    Ok(ChunkArtifact {
        index,
        subjects: entries.keys().map(|s| s.to_string()).collect(),
        payload,
    })
}
