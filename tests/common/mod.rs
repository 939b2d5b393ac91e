/*!
 * Common test utilities for the studentdb test suite
 */

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

use studentdb::{DatabaseConnection, SqliteStudentRepository, Student, StudentRepository};

/// Route library logs through env_logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Creates a repository over a fresh in-memory store
pub fn create_test_repo() -> SqliteStudentRepository {
    init_logging();
    SqliteStudentRepository::new_in_memory().expect("Failed to create test repository")
}

/// Saves an unpersisted student and returns the stored value
pub fn insert_student(
    repo: &SqliteStudentRepository,
    name: &str,
    birth_date: NaiveDate,
) -> Student {
    repo.save(Student::new(name, birth_date))
        .expect("Failed to insert student")
}

/// Inserts a phone row directly; the repository never writes phones
pub fn insert_phone(db: &DatabaseConnection, student_id: i64, area_code: &str, number: &str) {
    db.execute(|conn| {
        conn.execute(
            "INSERT INTO phones (student_id, area_code, number) VALUES (?1, ?2, ?3)",
            rusqlite::params![student_id, area_code, number],
        )?;
        Ok(())
    })
    .expect("Failed to insert phone");
}
