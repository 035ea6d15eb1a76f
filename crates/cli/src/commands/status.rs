use anyhow::{Context, Result};
use triage_core::model::{Category, ALL_CATEGORIES};

use crate::canonicalize_or_current;

/// Show per-category totals and the most recent scan run.
pub fn status_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = triage_core::db::ProjectContext::from_root(&root_path)?;

    let files = ctx.db.list_source_files().context("Failed to list source files")?;
    let cases = ctx.db.list_test_cases(None).context("Failed to list test cases")?;
    let latest = ctx.db.latest_scan_run().context("Failed to load scan runs")?;

    let count_for = |category: Category| -> usize {
        cases.iter().filter(|case| case.categories.contains(&category)).count()
    };
    let uncategorized = cases.iter().filter(|case| case.categories.is_empty()).count();

    if json {
        let status = serde_json::json!({
            "project": ctx.config.name,
            "files": files.len(),
            "tests": cases.len(),
            "categories": {
                "auth": count_for(Category::Auth),
                "empty-db": count_for(Category::EmptyDb),
                "positive": count_for(Category::Positive),
                "negative": count_for(Category::Negative),
            },
            "uncategorized": uncategorized,
            "latest_run": latest,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Project: {}", ctx.config.name);
    println!("Files: {}", files.len());
    println!("Tests: {}", cases.len());
    for category in ALL_CATEGORIES {
        println!("  {}: {}", category, count_for(category));
    }
    println!("  uncategorized: {}", uncategorized);

    match latest {
        Some(run) => {
            println!(
                "Last scan: {} ({} file(s), {} test(s))",
                run.finished_at, run.files_scanned, run.tests_found
            );
        }
        None => println!("Last scan: (never)"),
    }

    Ok(())
}
