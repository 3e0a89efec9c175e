/*!
 * Database entity models.
 *
 * These structures map directly to the five entity tables and provide
 * type-safe access to persisted data.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five stored entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Teacher,
    Group,
    Subject,
    Student,
    Grade,
}

impl EntityKind {
    /// Table backing this entity
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Teacher => "teachers",
            EntityKind::Group => "groups",
            EntityKind::Subject => "subjects",
            EntityKind::Student => "students",
            EntityKind::Grade => "grades",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Teacher => write!(f, "teacher"),
            EntityKind::Group => write!(f, "group"),
            EntityKind::Subject => write!(f, "subject"),
            EntityKind::Student => write!(f, "student"),
            EntityKind::Grade => write!(f, "grade"),
        }
    }
}

/// Teacher record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: i64,
    pub fullname: String,
}

impl TeacherRecord {
    pub fn new(id: i64, fullname: impl Into<String>) -> Self {
        Self {
            id,
            fullname: fullname.into(),
        }
    }
}

/// Student group record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
}

impl GroupRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Subject record, owned by exactly one teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: i64,
    pub name: String,
    /// References `teachers.id`
    pub teacher_id: i64,
}

impl SubjectRecord {
    pub fn new(id: i64, name: impl Into<String>, teacher_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            teacher_id,
        }
    }
}

/// Student record, member of exactly one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: i64,
    pub fullname: String,
    /// References `groups.id`
    pub group_id: i64,
}

impl StudentRecord {
    pub fn new(id: i64, fullname: impl Into<String>, group_id: i64) -> Self {
        Self {
            id,
            fullname: fullname.into(),
            group_id,
        }
    }
}

/// A single scored observation of one student in one subject on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: i64,
    /// Grade value; the generator keeps it within its configured range
    pub grade: i64,
    pub grade_date: NaiveDate,
    /// References `students.id`
    pub student_id: i64,
    /// References `subjects.id`
    pub subject_id: i64,
}

impl GradeRecord {
    pub fn new(id: i64, grade: i64, grade_date: NaiveDate, student_id: i64, subject_id: i64) -> Self {
        Self {
            id,
            grade,
            grade_date,
            student_id,
            subject_id,
        }
    }
}
