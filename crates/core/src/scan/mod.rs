//! Scan service: composes the extractor and classifier over loaded buffers
//! and persists the results into the project database.
//!
//! `scan_buffer` is pure and consumes already-loaded text; all IO (file
//! discovery, reading, hashing) belongs to the frontend. Files are
//! independent of each other, so a concurrent driver may scan several
//! buffers in parallel and hand the results to one `ScanRunner`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::db::{DbResult, ProjectContext, ScanRunRecord, SourceFileRecord, TestCaseRecord};
use crate::extract::{declaration_name, extract, ExtractOptions, UnterminatedDeclaration};
use crate::model::{Category, ClassifiedBlock};

/// One classified test within a scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTest {
    /// Declaration name (first string argument), when one was found.
    pub name: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub categories: std::collections::BTreeSet<Category>,
    /// The literal block text, whole lines.
    pub text: String,
}

/// Result of scanning one file's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileScan {
    pub path: String,
    /// Content hash, attached by the frontend after reading the file.
    pub hash: Option<String>,
    /// Tests in source order.
    pub tests: Vec<CategorizedTest>,
    /// Diagnostic for a declaration whose body never closed.
    pub unterminated: Option<UnterminatedDeclaration>,
}

/// Aggregate counts for one scan invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files: usize,
    pub tests: usize,
    pub auth: usize,
    pub empty_db: usize,
    pub positive: usize,
    pub negative: usize,
    /// Tests that matched no category pattern at all.
    pub uncategorized: usize,
}

impl ScanSummary {
    /// Fold one file scan into the totals.
    pub fn add(&mut self, scan: &FileScan) {
        self.files += 1;
        for test in &scan.tests {
            self.tests += 1;
            if test.categories.is_empty() {
                self.uncategorized += 1;
            }
            for category in &test.categories {
                match category {
                    Category::Auth => self.auth += 1,
                    Category::EmptyDb => self.empty_db += 1,
                    Category::Positive => self.positive += 1,
                    Category::Negative => self.negative += 1,
                }
            }
        }
    }

    /// Count for one category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Auth => self.auth,
            Category::EmptyDb => self.empty_db,
            Category::Positive => self.positive,
            Category::Negative => self.negative,
        }
    }
}

/// Scan one buffer: extract blocks, classify each, and pull the declaration
/// name. Pure function of `text`; performs no IO.
pub fn scan_buffer(path: &str, text: &str, options: &ExtractOptions) -> FileScan {
    let extraction = extract(text, options);
    let tests = extraction
        .blocks
        .into_iter()
        .map(|block| {
            let categories = classify(&block.text);
            CategorizedTest {
                name: declaration_name(&block.text),
                start_line: block.start_line,
                end_line: block.end_line,
                categories,
                text: block.text,
            }
        })
        .collect();

    FileScan {
        path: path.to_string(),
        hash: None,
        tests,
        unterminated: extraction.unterminated,
    }
}

/// Classify already-extracted blocks, preserving their source order.
pub fn classify_blocks(blocks: Vec<crate::model::TestBlock>) -> Vec<ClassifiedBlock> {
    blocks
        .into_iter()
        .map(|block| {
            let categories = classify(&block.text);
            ClassifiedBlock { block, categories }
        })
        .collect()
}

/// Coordinator that ties project context to persistence of scan results.
pub struct ScanRunner<'a> {
    pub ctx: &'a ProjectContext,
}

impl<'a> ScanRunner<'a> {
    /// Persist a batch of file scans and record the run.
    ///
    /// Each file's previous test cases are replaced, so re-scanning the same
    /// path is idempotent with respect to row counts.
    pub fn run(&self, scans: &[FileScan]) -> DbResult<ScanSummary> {
        let started_at = Utc::now().to_rfc3339();
        let mut summary = ScanSummary::default();

        for scan in scans {
            let record = SourceFileRecord::new(&scan.path).with_hash(scan.hash.clone());
            self.ctx.db.upsert_source_file(&record)?;

            let cases: Vec<TestCaseRecord> = scan
                .tests
                .iter()
                .map(|test| TestCaseRecord {
                    file: scan.path.clone(),
                    name: test.name.clone(),
                    start_line: test.start_line as i64,
                    end_line: test.end_line as i64,
                    categories: test.categories.clone(),
                    body: test.text.clone(),
                })
                .collect();
            self.ctx.db.replace_test_cases(&scan.path, &cases)?;

            summary.add(scan);
        }

        let finished_at = Utc::now().to_rfc3339();
        self.ctx.db.insert_scan_run(&ScanRunRecord {
            started_at,
            finished_at,
            files_scanned: summary.files as i64,
            tests_found: summary.tests as i64,
        })?;

        Ok(summary)
    }
}
