/*!
 * Database schema definitions and version checks.
 *
 * This module contains the SQL schema for the five academic record tables
 * and refuses databases written with any other schema version.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Entity tables in dependency order (referenced tables first)
pub const ENTITY_TABLES: [&str; 5] = ["teachers", "groups", "subjects", "students", "grades"];

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Foreign keys are a per-connection setting in SQLite
    conn.pragma_update(None, "foreign_keys", true)
        .context("Failed to enable foreign key enforcement")?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unsupported database schema v{} (expected v{})",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "teachers" (
            id INTEGER PRIMARY KEY,
            fullname TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS "groups" (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "subjects" (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            teacher_id INTEGER NOT NULL REFERENCES "teachers"(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_subjects_teacher ON "subjects"(teacher_id);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "students" (
            id INTEGER PRIMARY KEY,
            fullname TEXT NOT NULL,
            group_id INTEGER NOT NULL REFERENCES "groups"(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_students_group ON "students"(group_id);
        "#,
    )?;

    // grade_date is ISO-8601 text so MAX() is chronological
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "grades" (
            id INTEGER PRIMARY KEY,
            grade INTEGER NOT NULL,
            grade_date TEXT NOT NULL,
            student_id INTEGER NOT NULL REFERENCES "students"(id) ON DELETE CASCADE,
            subject_id INTEGER NOT NULL REFERENCES "subjects"(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_grades_student ON "grades"(student_id);
        CREATE INDEX IF NOT EXISTS idx_grades_subject ON "grades"(subject_id, grade_date);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
