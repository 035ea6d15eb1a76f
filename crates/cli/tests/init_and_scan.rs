use std::fs;

use tempfile::tempdir;
use triage_core::db::ProjectContext;
use triage_core::model::Category;

const FIXTURE: &str = r#"import { expect, test } from "./fixtures";

test("should return 401 when token missing", async () => {
  const response = await get("/v1/orders");
  expect(response.status).toBe(401);
});

test("should create order successfully", async () => {
  const response = await post("/v1/orders", payload);
  expect(response.status).toBe(201);
});
"#;

fn init_project(root: &std::path::Path) {
    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("init-project")
        .arg("--root")
        .arg(root)
        .arg("--name")
        .arg("ScanProject")
        .assert()
        .success();
}

/// Scanning a fixture file stores classified tests in the DB and writes a
/// report under reports/.
#[test]
fn scan_stores_classified_tests_and_writes_report() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_project(root);

    fs::create_dir_all(root.join("tests")).expect("create tests dir");
    fs::write(root.join("tests/orders.test.ts"), FIXTURE).expect("write fixture");

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .arg("tests/orders.test.ts")
        .assert()
        .success()
        .stdout(predicates::str::contains("Scanned 1 file(s), 2 test(s):"))
        .stdout(predicates::str::contains("auth: 1"))
        .stdout(predicates::str::contains("positive: 1"));

    // DB state: one file, two classified tests, one recorded run.
    let ctx = ProjectContext::from_root(root).expect("open project");
    let files = ctx.db.list_source_files().expect("list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "tests/orders.test.ts");
    assert!(files[0].hash.is_some());

    let cases = ctx.db.list_test_cases(None).expect("list cases");
    assert_eq!(cases.len(), 2);
    assert!(cases[0].categories.contains(&Category::Auth));
    assert!(cases[1].categories.contains(&Category::Positive));

    let runs = ctx.db.list_scan_runs().expect("list runs");
    assert_eq!(runs.len(), 1);

    // A report landed in reports/.
    let reports: Vec<_> = fs::read_dir(root.join("reports"))
        .expect("read reports dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("scan-"))
        .collect();
    assert_eq!(reports.len(), 1);
}

/// Scanning a directory walks it recursively for source files.
#[test]
fn scan_walks_directories_recursively() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_project(root);

    fs::create_dir_all(root.join("tests/nested")).expect("create nested dir");
    fs::write(root.join("tests/orders.test.ts"), FIXTURE).expect("write fixture");
    fs::write(
        root.join("tests/nested/quotes.test.ts"),
        "test(\"should return 400 when symbol is missing\", async () => {\n  expect(1).toBe(1);\n});\n",
    )
    .expect("write nested fixture");
    // Non-source files are skipped.
    fs::write(root.join("tests/README.md"), "# not scanned\n").expect("write readme");

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .arg("tests")
        .assert()
        .success()
        .stdout(predicates::str::contains("Scanned 2 file(s), 3 test(s):"))
        .stdout(predicates::str::contains("negative: 1"));
}

/// --json emits the full per-file scan results.
#[test]
fn scan_json_emits_machine_readable_results() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_project(root);

    fs::write(root.join("orders.test.ts"), FIXTURE).expect("write fixture");

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .arg("orders.test.ts")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicates::str::contains("\"categories\""))
        .stdout(predicates::str::contains("should return 401 when token missing"));
}

/// An unterminated declaration produces a warning but does not fail the scan.
#[test]
fn scan_warns_on_unterminated_declaration() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_project(root);

    fs::write(root.join("broken.test.ts"), "test(\"never closes\", () => {\n  const x = 1;\n")
        .expect("write fixture");

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .arg("broken.test.ts")
        .assert()
        .success()
        .stderr(predicates::str::contains("never closes"))
        .stdout(predicates::str::contains("Scanned 1 file(s), 0 test(s):"));
}
