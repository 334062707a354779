// src/config/consts.rs

// URL prefixes per dataset family
pub const CIE_URL_PREFIX: &str = "https://papers.xtremepape.rs/CAIE/";
pub const IAL_URL_PREFIX: &str =
    "https://qualifications.pearson.com/content/dam/pdf/International Advanced Level/";

// Chunking
pub const MAX_CHUNK_BYTES: usize = 800 * 1024;
// 0.95 MiB, floored: a dataset is split once its size is strictly above this
pub const SINGLE_FILE_LIMIT: usize = 996_147;

// Default batch inputs
pub const DEFAULT_INPUTS: &[&str] = &[
    "public/cie_IGCSE.json",
    "public/cie_O_Level.json",
    "public/cie_AS_and_A_Level.json",
    "public/ial_data.json",
];
pub const DEFAULT_CATALOGUE: &str = "public/cie_data.json";
pub const DEFAULT_SPLIT_PREFIX: &str = "cie_";
pub const CATEGORY_KEY: &str = "Category";

// Sentinels
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Session label → month number. Anything else encodes as 0.
pub const SESSION_MONTHS: &[(&str, u8)] = &[
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
    ("Feb/March", 3),
    ("May/June", 6),
    ("Oct/Nov", 11),
    ("Winter", 11),
    ("Summer", 6),
];

/// Field precedence lists: short key first, verbose legacy key second.
pub mod keys {
    pub const SUBJECT: &[&str] = &["S", "Subject"];
    pub const UNIT_CODE: &[&str] = &["uc", "Unit_Code"];
    pub const YEAR: &[&str] = &["y", "Year"];
    pub const SESSION: &[&str] = &["s", "Session"];
    pub const TYPE: &[&str] = &["t", "Type"];
    pub const URL: &[&str] = &["u", "URL"];
    pub const UNIT: &[&str] = &["U", "Unit"];
    pub const COMPONENT: &[&str] = &["C", "Component"];
    pub const TITLE: &[&str] = &["T", "Title"];
}
