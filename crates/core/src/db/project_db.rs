use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::db::{ScanRunRecord, SourceFileRecord, TestCaseRecord};
use crate::model::{decode_categories, encode_categories, Category};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for project database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    ///
    /// This is intentionally explicit so callers can surface a clear message
    /// instead of silently clobbering or misinterpreting data.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed project database.
///
/// This is a thin wrapper around `rusqlite::Connection` that is responsible for:
/// - Opening/creating the DB file.
/// - Applying schema migrations.
/// - Providing small, testable helpers for querying and updating records.
#[derive(Debug)]
pub struct ProjectDb {
    conn: Connection,
}

impl ProjectDb {
    /// Open (or create) a project database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert or refresh a source file record and return its row id.
    ///
    /// Paths are unique; re-scanning a known file updates its hash in place.
    pub fn upsert_source_file(&self, record: &SourceFileRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO source_files (path, hash)
            VALUES (?1, ?2)
            ON CONFLICT(path) DO UPDATE SET hash = excluded.hash
            "#,
            params![record.path, record.hash],
        )?;
        let id: i64 = self.conn.query_row(
            "SELECT id FROM source_files WHERE path = ?1",
            params![record.path],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// List all source files (ordered by id).
    pub fn list_source_files(&self) -> DbResult<Vec<SourceFileRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT path, hash
            FROM source_files
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SourceFileRecord { path: row.get(0)?, hash: row.get(1)? })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Replace all test cases recorded for one source file.
    ///
    /// A re-scan of the same path never duplicates rows: the file's previous
    /// cases are deleted before the new ones are inserted.
    pub fn replace_test_cases(&self, file: &str, cases: &[TestCaseRecord]) -> DbResult<()> {
        self.conn.execute("DELETE FROM test_cases WHERE file = ?1", params![file])?;
        for case in cases {
            self.conn.execute(
                r#"
                INSERT INTO test_cases (file, name, start_line, end_line, categories, body)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    case.file,
                    case.name,
                    case.start_line,
                    case.end_line,
                    encode_categories(&case.categories),
                    case.body
                ],
            )?;
        }
        Ok(())
    }

    /// List test cases, optionally filtered by category.
    ///
    /// Ordered by file and then start line, so output follows source order.
    pub fn list_test_cases(&self, category: Option<Category>) -> DbResult<Vec<TestCaseRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT file, name, start_line, end_line, categories, body
            FROM test_cases
            ORDER BY file, start_line
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            let encoded: String = row.get(4)?;
            Ok(TestCaseRecord {
                file: row.get(0)?,
                name: row.get(1)?,
                start_line: row.get(2)?,
                end_line: row.get(3)?,
                categories: decode_categories(&encoded),
                body: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            let record = row?;
            if let Some(wanted) = category {
                if !record.categories.contains(&wanted) {
                    continue;
                }
            }
            out.push(record);
        }
        Ok(out)
    }

    /// Insert a scan run record and return its row id.
    pub fn insert_scan_run(&self, record: &ScanRunRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO scan_runs (started_at, finished_at, files_scanned, tests_found)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.started_at,
                record.finished_at,
                record.files_scanned,
                record.tests_found
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List all scan runs (ordered by id).
    pub fn list_scan_runs(&self) -> DbResult<Vec<ScanRunRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT started_at, finished_at, files_scanned, tests_found
            FROM scan_runs
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ScanRunRecord {
                started_at: row.get(0)?,
                finished_at: row.get(1)?,
                files_scanned: row.get(2)?,
                tests_found: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// The most recent scan run, if any.
    pub fn latest_scan_run(&self) -> DbResult<Option<ScanRunRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT started_at, finished_at, files_scanned, tests_found
            FROM scan_runs
            ORDER BY id DESC
            LIMIT 1
            "#,
        )?;
        let mut rows = stmt.query_map([], |row| {
            Ok(ScanRunRecord {
                started_at: row.get(0)?,
                finished_at: row.get(1)?,
                files_scanned: row.get(2)?,
                tests_found: row.get(3)?,
            })
        })?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: initial schema (source_files, test_cases)
/// - 2: add scan_runs table
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        // Initial schema.
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS source_files (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT NOT NULL UNIQUE,
                hash TEXT
            );

            CREATE TABLE IF NOT EXISTS test_cases (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                file       TEXT NOT NULL,
                name       TEXT,
                start_line INTEGER NOT NULL,
                end_line   INTEGER NOT NULL,
                categories TEXT NOT NULL,
                body       TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS scan_runs (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at    TEXT NOT NULL,
                finished_at   TEXT NOT NULL,
                files_scanned INTEGER NOT NULL,
                tests_found   INTEGER NOT NULL
            );

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
