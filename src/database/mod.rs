/*!
 * Database module for persistent storage of students and their phones.
 *
 * This module provides SQLite-based persistence for:
 * - Connection provisioning (`ConnectionProvider`, `DatabaseConnection`)
 * - Row records and object-graph hydration from joined rows
 * - The `StudentRepository` contract and its SQLite implementation
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{ConnectionProvider, DatabaseConnection, DatabaseStats};
pub use repository::{SqliteStudentRepository, StudentRepository};
