/*!
 * Repository layer for database operations.
 *
 * This module provides the write path used by the seed batch and a small
 * read API over the raw entity tables. Analytical reads live in
 * `crate::query`.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    EntityKind, GradeRecord, GroupRecord, StudentRecord, SubjectRecord, TeacherRecord,
};
use super::schema::ENTITY_TABLES;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection handle
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Staging (used inside a caller-owned transaction)
    // =========================================================================

    /// Stage teacher rows
    pub fn insert_teachers(conn: &Connection, teachers: &[TeacherRecord]) -> rusqlite::Result<usize> {
        let mut stmt = conn.prepare_cached(r#"INSERT INTO "teachers" (id, fullname) VALUES (?1, ?2)"#)?;
        for teacher in teachers {
            stmt.execute(params![teacher.id, teacher.fullname])?;
        }
        debug!("Staged {} teachers", teachers.len());
        Ok(teachers.len())
    }

    /// Stage group rows
    pub fn insert_groups(conn: &Connection, groups: &[GroupRecord]) -> rusqlite::Result<usize> {
        let mut stmt = conn.prepare_cached(r#"INSERT INTO "groups" (id, name) VALUES (?1, ?2)"#)?;
        for group in groups {
            stmt.execute(params![group.id, group.name])?;
        }
        debug!("Staged {} groups", groups.len());
        Ok(groups.len())
    }

    /// Stage subject rows
    pub fn insert_subjects(conn: &Connection, subjects: &[SubjectRecord]) -> rusqlite::Result<usize> {
        let mut stmt = conn.prepare_cached(
            r#"INSERT INTO "subjects" (id, name, teacher_id) VALUES (?1, ?2, ?3)"#,
        )?;
        for subject in subjects {
            stmt.execute(params![subject.id, subject.name, subject.teacher_id])?;
        }
        debug!("Staged {} subjects", subjects.len());
        Ok(subjects.len())
    }

    /// Stage student rows
    pub fn insert_students(conn: &Connection, students: &[StudentRecord]) -> rusqlite::Result<usize> {
        let mut stmt = conn.prepare_cached(
            r#"INSERT INTO "students" (id, fullname, group_id) VALUES (?1, ?2, ?3)"#,
        )?;
        for student in students {
            stmt.execute(params![student.id, student.fullname, student.group_id])?;
        }
        debug!("Staged {} students", students.len());
        Ok(students.len())
    }

    /// Stage grade rows
    pub fn insert_grades(conn: &Connection, grades: &[GradeRecord]) -> rusqlite::Result<usize> {
        let mut stmt = conn.prepare_cached(
            r#"
            INSERT INTO "grades" (id, grade, grade_date, student_id, subject_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;
        for grade in grades {
            stmt.execute(params![
                grade.id,
                grade.grade,
                grade.grade_date,
                grade.student_id,
                grade.subject_id,
            ])?;
        }
        debug!("Staged {} grades", grades.len());
        Ok(grades.len())
    }

    /// Delete every entity row, dependents first
    pub fn delete_all(conn: &Connection) -> rusqlite::Result<usize> {
        let mut deleted = 0;
        for table in ENTITY_TABLES.iter().rev() {
            deleted += conn.execute(&format!(r#"DELETE FROM "{}""#, table), [])?;
        }
        Ok(deleted)
    }

    /// Whether every entity table is empty
    pub fn is_empty_sync(conn: &Connection) -> rusqlite::Result<bool> {
        for table in ENTITY_TABLES {
            let any: Option<i64> = conn
                .query_row(&format!(r#"SELECT 1 FROM "{}" LIMIT 1"#, table), [], |row| row.get(0))
                .optional()?;
            if any.is_some() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether a row with the given id exists
    pub fn exists_sync(conn: &Connection, kind: EntityKind, id: i64) -> rusqlite::Result<bool> {
        let sql = format!(r#"SELECT EXISTS(SELECT 1 FROM "{}" WHERE id = ?1)"#, kind.table());
        conn.query_row(&sql, [id], |row| row.get(0))
    }

    // =========================================================================
    // Entity reads
    // =========================================================================

    /// Whether every entity table is empty
    pub fn is_empty(&self) -> Result<bool> {
        self.db.execute(|conn| Ok(Self::is_empty_sync(conn)?))
    }

    /// Whether a row with the given id exists
    pub fn exists(&self, kind: EntityKind, id: i64) -> Result<bool> {
        self.db.execute(|conn| Ok(Self::exists_sync(conn, kind, id)?))
    }

    /// List all teachers by id
    pub fn list_teachers(&self) -> Result<Vec<TeacherRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(r#"SELECT id, fullname FROM "teachers" ORDER BY id"#)?;
            let rows = stmt
                .query_map([], |row| Ok(TeacherRecord::new(row.get(0)?, row.get::<_, String>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// List all groups by id
    pub fn list_groups(&self) -> Result<Vec<GroupRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(r#"SELECT id, name FROM "groups" ORDER BY id"#)?;
            let rows = stmt
                .query_map([], |row| Ok(GroupRecord::new(row.get(0)?, row.get::<_, String>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// List all subjects by id
    pub fn list_subjects(&self) -> Result<Vec<SubjectRecord>> {
        self.db.execute(|conn| {
            let mut stmt =
                conn.prepare(r#"SELECT id, name, teacher_id FROM "subjects" ORDER BY id"#)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(SubjectRecord::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// List all students by id
    pub fn list_students(&self) -> Result<Vec<StudentRecord>> {
        self.db.execute(|conn| {
            let mut stmt =
                conn.prepare(r#"SELECT id, fullname, group_id FROM "students" ORDER BY id"#)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(StudentRecord::new(row.get(0)?, row.get::<_, String>(1)?, row.get(2)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// List all grades by id
    pub fn list_grades(&self) -> Result<Vec<GradeRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"SELECT id, grade, grade_date, student_id, subject_id FROM "grades" ORDER BY id"#,
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(GradeRecord::new(
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }
}
