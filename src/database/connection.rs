/*!
 * Database connection management.
 *
 * This module handles SQLite connection creation and initialization, and
 * exposes the `ConnectionProvider` factory the rest of the crate uses to
 * obtain a ready-to-query store handle.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::schema;
use crate::app_config::DatabaseConfig;
use crate::errors::StoreError;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "students.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "studentdb";

/// Path value that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Factory for live store handles
///
/// Credentials, location and driver settings are the provider's business;
/// callers only ever ask for a connection.
pub trait ConnectionProvider {
    /// Open a connection with the schema in place
    fn create_connection(&self) -> Result<DatabaseConnection>;
}

impl ConnectionProvider for DatabaseConfig {
    fn create_connection(&self) -> Result<DatabaseConnection> {
        DatabaseConnection::from_config(self)
    }
}

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Connection wrapped in Arc<Mutex> so repositories can be cloned
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let config = DatabaseConfig {
            path: db_path.as_ref().to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Self::from_config(&DatabaseConfig::in_memory())
    }

    /// Open the database described by `config`
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let (db_path, conn) = if config.path == IN_MEMORY_PATH {
            debug!("Creating in-memory database");
            let conn =
                Connection::open_in_memory().context("Failed to create in-memory database")?;
            (PathBuf::from(IN_MEMORY_PATH), conn)
        } else {
            let db_path = PathBuf::from(&config.path);

            // Ensure parent directory exists
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }

            info!("Opening database at: {:?}", db_path);
            let conn = Connection::open(&db_path)
                .with_context(|| format!("Failed to open database: {:?}", db_path))?;
            (db_path, conn)
        };

        configure(&conn, config)?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        // Try to use the system data directory
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether this connection points at a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and runs the provided closure
    /// with access to the connection. The lock is held for the whole closure.
    pub fn execute<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire database lock: {}", e)))?;

        f(&conn)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats, StoreError> {
        self.execute(|conn| {
            let student_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;

            let phone_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM phones", [], |row| row.get(0))?;

            // Get file size if not in-memory
            let file_size_bytes = if self.is_in_memory() {
                0
            } else {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            };

            Ok(DatabaseStats {
                student_count,
                phone_count,
                file_size_bytes,
            })
        })
    }
}

fn configure(conn: &Connection, config: &DatabaseConfig) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .context("Failed to set busy timeout")?;

    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys={};", foreign_keys))
        .context("Failed to configure foreign keys")?;

    Ok(())
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of student rows
    pub student_count: i64,
    /// Number of phone rows
    pub phone_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Students: {}, Phones: {}, Size: {} KB",
            self.student_count,
            self.phone_count,
            self.file_size_bytes / 1024
        )
    }
}
