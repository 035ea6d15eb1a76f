use std::fs;

use tempfile::tempdir;

const FIXTURE: &str = r#"import { expect, test } from "./fixtures";

test("should return 401 when token missing", async () => {
  const response = await get("/v1/orders");
  expect(response.status).toBe(401);
});

test("should create order successfully", async () => {
  const response = await post("/v1/orders", payload);
  expect(response.status).toBe(201);
});

test("does something unclassifiable", async () => {
  await poke();
});
"#;

fn init_and_scan(root: &std::path::Path) {
    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("init-project")
        .arg("--root")
        .arg(root)
        .arg("--name")
        .arg("OrganizeProject")
        .assert()
        .success();

    fs::create_dir_all(root.join("tests")).expect("create tests dir");
    fs::write(root.join("tests/orders.test.ts"), FIXTURE).expect("write fixture");

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("scan")
        .arg("--root")
        .arg(root)
        .arg("tests/orders.test.ts")
        .assert()
        .success();
}

/// organize regroups classified tests into per-category files with
/// provenance comments; unclassified tests are only counted.
#[test]
fn organize_writes_per_category_files() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_and_scan(root);

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("organize")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicates::str::contains("1 uncategorized test(s) left in place"));

    let auth_file = root.join("organized/auth/orders.test.ts");
    let auth_contents = fs::read_to_string(&auth_file).expect("read auth output");
    assert!(auth_contents.contains("// source: tests/orders.test.ts:3"));
    assert!(auth_contents.contains("should return 401 when token missing"));
    assert!(!auth_contents.contains("should create order successfully"));

    let positive_file = root.join("organized/positive/orders.test.ts");
    let positive_contents = fs::read_to_string(&positive_file).expect("read positive output");
    assert!(positive_contents.contains("should create order successfully"));

    // No negative or empty-db tests, so no directories for them.
    assert!(!root.join("organized/negative").exists());
    assert!(!root.join("organized/empty-db").exists());
}

/// organize on a project with no recorded tests is a friendly no-op.
#[test]
fn organize_without_scans_is_a_noop() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("init-project")
        .arg("--root")
        .arg(root)
        .arg("--name")
        .arg("EmptyProject")
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("organize")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicates::str::contains("No test cases recorded"));
}

/// list-tests filters by category and prints provenance.
#[test]
fn list_tests_filters_by_category() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_and_scan(root);

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("list-tests")
        .arg("--root")
        .arg(root)
        .arg("--category")
        .arg("auth")
        .assert()
        .success()
        .stdout(predicates::str::contains("Tests (1):"))
        .stdout(predicates::str::contains("should return 401 when token missing"))
        .stdout(predicates::str::contains("tests/orders.test.ts:3"));
}

/// status reflects scan results.
#[test]
fn status_reports_category_totals() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init_and_scan(root);

    assert_cmd::cargo::cargo_bin_cmd!("test-triage")
        .arg("status")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicates::str::contains("Tests: 3"))
        .stdout(predicates::str::contains("auth: 1"))
        .stdout(predicates::str::contains("uncategorized: 1"))
        .stdout(predicates::str::contains("Last scan:"));
}
