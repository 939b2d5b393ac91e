/*!
 * Bootstrap DDL for the students store.
 *
 * The repository assumes two tables exist. This module creates them when
 * they are missing so a fresh file or in-memory database is usable. It
 * does not version or migrate anything.
 */

use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;

/// Create the `students` and `phones` tables if they do not exist yet
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS phones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id),
            area_code TEXT NOT NULL,
            number TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_students_birth_date ON students(birth_date);
        CREATE INDEX IF NOT EXISTS idx_phones_student ON phones(student_id);
        "#,
    )
    .context("Failed to create students schema")?;

    debug!("Students schema ready");
    Ok(())
}
