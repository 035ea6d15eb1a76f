use anyhow::{anyhow, Context, Result};
use triage_core::model::{encode_categories, Category};

use crate::canonicalize_or_current;

/// Parse a CLI category filter into a `Category`.
pub fn validate_category(name: &str) -> Result<Category> {
    Category::parse(name).ok_or_else(|| {
        anyhow!("Invalid category '{}'. Allowed: auth, empty-db, positive, negative", name)
    })
}

/// List test cases recorded in the project database.
pub fn list_tests_command(root: &str, category: Option<&str>, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = triage_core::db::ProjectContext::from_root(&root_path)?;

    let filter = category.map(validate_category).transpose()?;
    let cases = ctx.db.list_test_cases(filter).context("Failed to list test cases")?;

    if json {
        let serialized = serde_json::to_string_pretty(&cases)?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Tests ({}):", cases.len());
    if cases.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for case in cases {
        let name = case.name.as_deref().unwrap_or("(unnamed)");
        let labels = if case.categories.is_empty() {
            "-".to_string()
        } else {
            encode_categories(&case.categories)
        };
        println!("  - {}:{} {} [{}]", case.file, case.start_line, name, labels);
    }

    Ok(())
}
