/*!
 * Database module for the academic records store.
 *
 * This module provides SQLite-based persistence for:
 * - Teachers, groups, subjects, students and grades
 * - Schema versioning
 * - Batched inserts used by the seed generator
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{EntityKind, GradeRecord, GroupRecord, StudentRecord, SubjectRecord, TeacherRecord};
pub use repository::Repository;
