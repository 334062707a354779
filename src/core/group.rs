// src/core/group.rs
use std::hash::Hash;

use indexmap::IndexMap;

/// Subject → records, in first-seen subject order.
pub type GroupedDataset<T> = IndexMap<String, Vec<T>>;

/// Stable partition of `items` by `key`: keys keep first-seen order and
/// every item keeps its relative order inside its group.
pub fn group_by<K, T, I, F>(items: I, mut key: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> K,
{
    let mut grouped: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}

/// Total records across all groups.
pub fn record_count<K, T>(grouped: &IndexMap<K, Vec<T>>) -> usize {
    grouped.values().map(Vec::len).sum()
}
