use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use triage_core::db::ProjectLayout;
use triage_core::extract::ExtractOptions;

/// File extensions treated as scannable source files when walking a directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Load extraction options from `.triage/scan.{yaml,yml,json}` when present,
/// falling back to the defaults.
pub fn load_scan_options(layout: &ProjectLayout) -> Result<ExtractOptions> {
    for ext in ["yaml", "yml", "json"] {
        let path = layout.meta_dir.join(format!("scan.{ext}"));
        if !path.is_file() {
            continue;
        }
        let body = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scan options at {}", path.display()))?;
        let options = if ext == "json" {
            serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse scan options at {}", path.display()))?
        } else {
            serde_yaml::from_str(&body)
                .with_context(|| format!("Failed to parse scan options at {}", path.display()))?
        };
        return Ok(options);
    }
    Ok(ExtractOptions::default())
}

/// Collect scannable files for one scan target.
///
/// A file path is taken as-is; a directory is walked recursively and filtered
/// to `SOURCE_EXTENSIONS`. Results are sorted for deterministic scan order.
pub fn collect_source_files(target: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if target.is_file() {
        files.push(target.to_path_buf());
    } else if target.is_dir() {
        collect_dir(target, &mut files)?;
        files.sort();
    }
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_dir(&entry_path, files)?;
            continue;
        }
        let ext = entry_path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if SOURCE_EXTENSIONS.contains(&ext) {
            files.push(entry_path);
        }
    }
    Ok(())
}
