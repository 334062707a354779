// src/split.rs
//
// Splits the combined flat catalogue into one file per qualification
// category (`cie_IGCSE.json`, `cie_O_Level.json`, ...).

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::config::consts::CATEGORY_KEY;
use crate::core::group::group_by;
use crate::core::record::{value_text, RawRecord};
use crate::core::sanitize::{category_file_stem, clean_subject};

#[derive(Debug, Default)]
pub struct CategorySplit {
    pub by_category: IndexMap<String, Vec<RawRecord>>,
    /// Records without a usable category.
    pub uncategorized: usize,
}

fn category_of(raw: &RawRecord) -> Option<String> {
    raw.get(CATEGORY_KEY)
        .and_then(value_text)
        .map(|c| clean_subject(&c))
        .filter(|c| !c.is_empty())
}

/// Partition by category, first-seen category order, record order preserved.
pub fn split_by_category(records: Vec<RawRecord>) -> CategorySplit {
    let total = records.len();
    let tagged: Vec<(String, RawRecord)> = records
        .into_iter()
        .filter_map(|r| {
            let cat = category_of(&r);
            if cat.is_none() {
                logw!("Split: record without category skipped");
            }
            cat.map(|c| (c, r))
        })
        .collect();
    let uncategorized = total - tagged.len();

    let by_category = group_by(tagged, |(c, _)| c.clone())
        .into_iter()
        .map(|(c, rows)| (c, rows.into_iter().map(|(_, r)| r).collect()))
        .collect();

    CategorySplit { by_category, uncategorized }
}

/// `{dir}/{prefix}{stem}.json` for a category.
pub fn category_path(dir: &Path, prefix: &str, category: &str) -> PathBuf {
    dir.join(format!("{prefix}{}.json", category_file_stem(category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_by_category_and_counts_missing() {
        let rows: Vec<RawRecord> = [
            json!({"Category": "[IGCSE]", "Subject": "A"}),
            json!({"Category": "O Level", "Subject": "B"}),
            json!({"Subject": "C"}),
            json!({"Category": "IGCSE", "Subject": "D"}),
            json!({"Category": "", "Subject": "E"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();

        let split = split_by_category(rows);
        assert_eq!(split.uncategorized, 2);
        assert_eq!(split.by_category.keys().collect::<Vec<_>>(), ["IGCSE", "O Level"]);
        assert_eq!(split.by_category["IGCSE"].len(), 2);
        assert_eq!(split.by_category["IGCSE"][1]["Subject"], "D");
    }

    #[test]
    fn category_paths() {
        assert_eq!(
            category_path(Path::new("public"), "cie_", "AS and A Level"),
            PathBuf::from("public/cie_AS_and_A_Level.json")
        );
    }
}
