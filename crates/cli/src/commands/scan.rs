use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use triage_core::model::ALL_CATEGORIES;
use triage_core::scan::{scan_buffer, FileScan, ScanRunner, ScanSummary};

use crate::commands::{collect_source_files, load_scan_options};
use crate::{canonicalize_or_current, relative_to_root, sha256_file};

/// Scan the given files/directories, classify every test declaration, and
/// persist the results into the project database.
pub fn scan_command(root: &str, paths: &[String], json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = triage_core::db::ProjectContext::from_root(&root_path)?;
    let options = load_scan_options(&ctx.layout)?;

    // Resolve each target against the project root and expand directories.
    let mut files = Vec::new();
    for path in paths {
        let input = Path::new(path);
        let abs = if input.is_absolute() { input.to_path_buf() } else { root_path.join(input) };
        if !abs.exists() {
            return Err(anyhow!("Scan target does not exist: {}", abs.display()));
        }
        let mut collected = collect_source_files(&abs)?;
        if collected.is_empty() {
            eprintln!("warning: no scannable source files under {}", abs.display());
        }
        files.append(&mut collected);
    }
    files.sort();
    files.dedup();

    let mut scans: Vec<FileScan> = Vec::new();
    for file in &files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("Failed to read source file {}", file.display()))?;
        let rel = relative_to_root(file, &root_path);

        let mut scan = scan_buffer(&rel, &text, &options);
        scan.hash = Some(sha256_file(file)?);

        if let Some(unterminated) = &scan.unterminated {
            eprintln!(
                "warning: {}:{}: test declaration body never closes; declaration dropped",
                rel, unterminated.line
            );
        }
        scans.push(scan);
    }

    let runner = ScanRunner { ctx: &ctx };
    let summary = runner.run(&scans).context("Failed to persist scan results")?;

    let report_path = write_scan_report(&ctx.layout, &summary, &scans)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scans)?);
        return Ok(());
    }

    println!("Scanned {} file(s), {} test(s):", summary.files, summary.tests);
    for category in ALL_CATEGORIES {
        println!("  {}: {}", category, summary.count(category));
    }
    println!("  uncategorized: {}", summary.uncategorized);
    println!("Report: {}", report_path.display());

    Ok(())
}

/// Write a structured report for this scan under `reports/`.
fn write_scan_report(
    layout: &triage_core::db::ProjectLayout,
    summary: &ScanSummary,
    scans: &[FileScan],
) -> Result<std::path::PathBuf> {
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to ensure reports dir {}", layout.reports_dir.display())
    })?;

    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let report_path = layout.reports_dir.join(format!("scan-{stamp}.json"));

    let report = serde_json::json!({
        "summary": summary,
        "files": scans,
    });
    let serialized = serde_json::to_string_pretty(&report)?;
    fs::write(&report_path, serialized)
        .with_context(|| format!("Failed to write scan report at {}", report_path.display()))?;

    Ok(report_path)
}
