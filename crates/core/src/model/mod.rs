//! Core data model for test blocks, categories, and classification results.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One extracted test declaration: a contiguous span of the source buffer
/// running from the declaration line through the line containing its matching
/// closing brace.
///
/// Offsets are byte offsets into the buffer; `end_offset` is inclusive (the
/// last byte of the closing line). Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestBlock {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

/// Behavioral category assignable to a test block.
///
/// The set is closed: these four labels are the complete output vocabulary of
/// the classifier. A block may carry several of them, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Auth,
    EmptyDb,
    Positive,
    Negative,
}

/// All categories, in display order.
pub const ALL_CATEGORIES: [Category; 4] =
    [Category::Auth, Category::EmptyDb, Category::Positive, Category::Negative];

impl Category {
    /// Stable wire name, used in JSON output, DB storage, and CLI filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Auth => "auth",
            Category::EmptyDb => "empty-db",
            Category::Positive => "positive",
            Category::Negative => "negative",
        }
    }

    /// Parse a wire name back into a category. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "auth" => Some(Category::Auth),
            "empty-db" => Some(Category::EmptyDb),
            "positive" => Some(Category::Positive),
            "negative" => Some(Category::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a category set as a comma-joined string for DB storage.
pub fn encode_categories(categories: &BTreeSet<Category>) -> String {
    categories.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(",")
}

/// Decode a comma-joined category string from DB storage.
///
/// Unknown names are ignored rather than rejected, so rows written by a newer
/// version with extra labels still load.
pub fn decode_categories(encoded: &str) -> BTreeSet<Category> {
    encoded.split(',').filter_map(|part| Category::parse(part.trim())).collect()
}

/// The categories assigned to one extracted block.
///
/// Pairs the block with its label set; sequences of these preserve the
/// source order of the blocks they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedBlock {
    pub block: TestBlock,
    pub categories: BTreeSet<Category>,
}
