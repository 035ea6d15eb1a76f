use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use triage_core::db::TestCaseRecord;
use triage_core::model::ALL_CATEGORIES;

use crate::canonicalize_or_current;

/// Regroup recorded test cases into per-category files under `organized/`.
///
/// Each category gets a directory holding one file per source file that
/// contributed tests; every block is preceded by a provenance line pointing
/// back at its origin. Tests that matched no category are left where they
/// are and reported.
pub fn organize_command(root: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = triage_core::db::ProjectContext::from_root(&root_path)?;

    let cases = ctx.db.list_test_cases(None).context("Failed to list test cases")?;
    if cases.is_empty() {
        println!("No test cases recorded; run `scan` first.");
        return Ok(());
    }

    let mut written = 0;
    for category in ALL_CATEGORIES {
        // Group this category's tests by the file they came from.
        let mut by_file: BTreeMap<&str, Vec<&TestCaseRecord>> = BTreeMap::new();
        for case in cases.iter().filter(|case| case.categories.contains(&category)) {
            by_file.entry(case.file.as_str()).or_default().push(case);
        }
        if by_file.is_empty() {
            continue;
        }

        let category_dir = ctx.layout.category_output_dir(category);
        fs::create_dir_all(&category_dir).with_context(|| {
            format!("Failed to ensure category dir {}", category_dir.display())
        })?;

        for (file, group) in by_file {
            let out_name = Path::new(file)
                .file_name()
                .and_then(|os| os.to_str())
                .unwrap_or("unnamed.test.ts");
            let out_path = category_dir.join(out_name);

            let mut contents = String::new();
            for case in group {
                contents.push_str(&format!("// source: {}:{}\n", case.file, case.start_line));
                contents.push_str(&case.body);
                contents.push_str("\n\n");
            }

            fs::write(&out_path, contents).with_context(|| {
                format!("Failed to write organized file at {}", out_path.display())
            })?;
            written += 1;
            println!("Wrote {}", out_path.display());
        }
    }

    let uncategorized = cases.iter().filter(|case| case.categories.is_empty()).count();
    println!("Organized {} file(s); {} uncategorized test(s) left in place.", written, uncategorized);

    Ok(())
}
