use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::Category;

/// Record describing a source file known to the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFileRecord {
    /// Path to the file, relative to the project root if possible.
    pub path: String,
    /// Optional content hash for change detection (SHA-256).
    pub hash: Option<String>,
}

impl SourceFileRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), hash: None }
    }

    /// Builder-style helper to attach a hash when constructing a record.
    pub fn with_hash(mut self, hash: Option<String>) -> Self {
        self.hash = hash;
        self
    }
}

/// Record describing one extracted test case and its classification.
///
/// Line numbers are 1-based and refer to the source file the case came from.
/// The full block text is stored so regrouping does not need to re-read (or
/// re-extract) the original file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCaseRecord {
    /// Source file path, as stored in `SourceFileRecord`.
    pub file: String,
    /// Declaration name (first string argument), when one was found.
    pub name: Option<String>,
    pub start_line: i64,
    pub end_line: i64,
    /// Assigned categories; may be empty.
    pub categories: BTreeSet<Category>,
    /// The literal block text, whole lines.
    pub body: String,
}

/// Record describing a scan run (extraction + classification pass) for
/// bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRunRecord {
    pub started_at: String,
    pub finished_at: String,
    pub files_scanned: i64,
    pub tests_found: i64,
}
