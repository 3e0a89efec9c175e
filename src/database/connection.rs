/*!
 * Database connection management.
 *
 * This module handles SQLite database connection creation and
 * initialization. The handle is passed explicitly to every caller; the
 * underlying connection closes when the last clone is dropped.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "gradebook.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "gradebook";

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
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

    /// Whether this handle points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == ":memory:"
    }

    /// Acquire the connection
    ///
    /// A poisoned lock still guards a usable connection: any transaction the
    /// panicking holder left open was rolled back when it was dropped.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.connection.lock() {
            Ok(conn) => conn,
            Err(poisoned) => {
                warn!("Database lock was poisoned, recovering connection");
                poisoned.into_inner()
            }
        }
    }

    /// Execute a database operation with the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.lock())
    }

    /// Execute a read with a caller-chosen error type
    pub fn read<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
    {
        f(&self.lock())
    }

    /// Begin a transaction and execute operations within it
    ///
    /// The transaction commits only if `f` succeeds. Any error rolls back
    /// every statement issued inside `f` before it is returned.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&rusqlite::Transaction) -> std::result::Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut conn = self.lock();

        let tx = conn.transaction()?;
        match f(&tx) {
            Ok(result) => {
                tx.commit()?;
                Ok(result)
            }
            Err(e) => {
                warn!("Transaction failed, rolling back");
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback reported an error: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        self.execute(|conn| {
            let count = |table: &str| -> Result<i64> {
                let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, table);
                conn.query_row(&sql, [], |row| row.get(0))
                    .with_context(|| format!("Failed to count rows in {}", table))
            };

            let file_size = if self.is_in_memory() {
                0
            } else {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            };

            Ok(DatabaseStats {
                teacher_count: count("teachers")?,
                group_count: count("groups")?,
                subject_count: count("subjects")?,
                student_count: count("students")?,
                grade_count: count("grades")?,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub teacher_count: i64,
    pub group_count: i64,
    pub subject_count: i64,
    pub student_count: i64,
    pub grade_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl DatabaseStats {
    /// Total rows across the five entity tables
    pub fn total_rows(&self) -> i64 {
        self.teacher_count + self.group_count + self.subject_count + self.student_count + self.grade_count
    }
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Teachers: {}, Groups: {}, Subjects: {}, Students: {}, Grades: {}, Size: {} KB",
            self.teacher_count,
            self.group_count,
            self.subject_count,
            self.student_count,
            self.grade_count,
            self.file_size_bytes / 1024
        )
    }
}
