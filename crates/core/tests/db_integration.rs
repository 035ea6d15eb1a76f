use std::collections::BTreeSet;

use tempfile::tempdir;
use triage_core::db::{ProjectDb, ScanRunRecord, SourceFileRecord, TestCaseRecord};
use triage_core::model::Category;

#[test]
fn project_db_initializes_and_round_trips_records() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("project.db");

    // First open should create schema and allow inserts.
    {
        let db = ProjectDb::open(&db_path).expect("open db");
        let conn = db.connection();

        let version: i32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, 2);

        let file = SourceFileRecord::new("tests/orders.test.ts")
            .with_hash(Some("cafebabe".to_string()));
        let id = db.upsert_source_file(&file).expect("upsert file");
        assert!(id > 0);

        let mut categories = BTreeSet::new();
        categories.insert(Category::Auth);
        categories.insert(Category::EmptyDb);
        let case = TestCaseRecord {
            file: "tests/orders.test.ts".to_string(),
            name: Some("should return 401 when no orders exist".to_string()),
            start_line: 3,
            end_line: 8,
            categories,
            body: "test(\"should return 401 when no orders exist\", ...)".to_string(),
        };
        db.replace_test_cases("tests/orders.test.ts", std::slice::from_ref(&case))
            .expect("replace cases");

        let cases = db.list_test_cases(None).expect("list cases");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0], case);
    }

    // Second open should see existing schema and data.
    {
        let db = ProjectDb::open(&db_path).expect("re-open db");

        let files = db.list_source_files().expect("list files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "tests/orders.test.ts");

        let cases = db.list_test_cases(None).expect("list cases");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name.as_deref(), Some("should return 401 when no orders exist"));
    }
}

/// Upserting the same path twice keeps one row and refreshes the hash.
#[test]
fn upsert_source_file_refreshes_hash_in_place() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("project.db");
    let db = ProjectDb::open(&db_path).expect("open db");

    let first = SourceFileRecord::new("a.test.ts").with_hash(Some("aaaa".to_string()));
    let id_first = db.upsert_source_file(&first).expect("first upsert");

    let second = SourceFileRecord::new("a.test.ts").with_hash(Some("bbbb".to_string()));
    let id_second = db.upsert_source_file(&second).expect("second upsert");

    assert_eq!(id_first, id_second);

    let files = db.list_source_files().expect("list files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hash.as_deref(), Some("bbbb"));
}

#[test]
fn scan_runs_are_recorded_and_latest_is_found() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("project.db");
    let db = ProjectDb::open(&db_path).expect("open db");

    assert!(db.latest_scan_run().expect("latest on empty db").is_none());

    let first = ScanRunRecord {
        started_at: "2026-01-01T00:00:00+00:00".to_string(),
        finished_at: "2026-01-01T00:00:01+00:00".to_string(),
        files_scanned: 2,
        tests_found: 10,
    };
    let second = ScanRunRecord {
        started_at: "2026-01-02T00:00:00+00:00".to_string(),
        finished_at: "2026-01-02T00:00:01+00:00".to_string(),
        files_scanned: 3,
        tests_found: 12,
    };
    db.insert_scan_run(&first).expect("insert first");
    db.insert_scan_run(&second).expect("insert second");

    let runs = db.list_scan_runs().expect("list runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], first);

    let latest = db.latest_scan_run().expect("latest").expect("some run");
    assert_eq!(latest, second);
}

/// Unknown category names stored by a newer version are ignored on load
/// instead of failing the whole row.
#[test]
fn unknown_category_names_are_ignored_on_load() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("project.db");
    let db = ProjectDb::open(&db_path).expect("open db");

    db.connection()
        .execute(
            "INSERT INTO test_cases (file, name, start_line, end_line, categories, body)
             VALUES ('f.ts', 'future test', 1, 3, 'auth,flaky', 'test(...)')",
            [],
        )
        .expect("raw insert");

    let cases = db.list_test_cases(None).expect("list cases");
    assert_eq!(cases.len(), 1);
    let expected: BTreeSet<Category> = [Category::Auth].into_iter().collect();
    assert_eq!(cases[0].categories, expected);
}
