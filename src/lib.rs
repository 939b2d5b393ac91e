/*!
 * # studentdb
 *
 * A small data-access layer for a students domain: it persists students
 * and reads back the phones they own from a SQLite store.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `domain`: the `Student` and `Phone` model types
 * - `database`: store access:
 *   - `database::connection`: `ConnectionProvider` and `DatabaseConnection`
 *   - `database::schema`: bootstrap DDL for the `students` and `phones` tables
 *   - `database::models`: row records and join hydration
 *   - `database::repository`: `StudentRepository` and its SQLite implementation
 * - `app_config`: Configuration management
 * - `errors`: Custom error types
 *
 * ## Example
 *
 * ```no_run
 * use chrono::NaiveDate;
 * use studentdb::{ConnectionProvider, DatabaseConfig, SqliteStudentRepository, Student, StudentRepository};
 *
 * let connection = DatabaseConfig::in_memory().create_connection()?;
 * let repository = SqliteStudentRepository::new(connection);
 *
 * let birth_date = NaiveDate::from_ymd_opt(2000, 12, 12).unwrap();
 * let student = repository.save(Student::new("Vinicius Francischini", birth_date))?;
 * assert!(student.id().is_some());
 * # Ok::<(), anyhow::Error>(())
 * ```
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]

pub mod app_config;
pub mod database;
pub mod domain;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, DatabaseConfig, LogLevel};
pub use database::{
    ConnectionProvider, DatabaseConnection, DatabaseStats, SqliteStudentRepository,
    StudentRepository,
};
pub use domain::{Phone, Student};
pub use errors::{AppError, ModelError, StoreError};
