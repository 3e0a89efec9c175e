/*!
 * Result row types for the query catalog.
 *
 * Each type reads its columns by projection alias, so the mapping does not
 * depend on column position in the rendered SQL.
 */

use chrono::NaiveDate;
use rusqlite::Row;
use serde::Serialize;
use std::fmt;

/// Mapping from one result row
pub trait CatalogRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Q1, Q2: a student with their average grade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentAverage {
    pub student: String,
    pub average: f64,
}

impl CatalogRow for StudentAverage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student: row.get("student")?,
            average: row.get("avg_grade")?,
        })
    }
}

/// Q3: a group with its average grade in one subject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub group: String,
    pub average: f64,
}

impl CatalogRow for GroupAverage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            group: row.get("group_name")?,
            average: row.get("avg_grade")?,
        })
    }
}

/// Q5: a subject taught by a teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherCourse {
    pub teacher: String,
    pub subject: String,
}

impl CatalogRow for TeacherCourse {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            teacher: row.get("teacher")?,
            subject: row.get("subject")?,
        })
    }
}

/// Q6: a student in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMember {
    pub group: String,
    pub student: String,
}

impl CatalogRow for GroupMember {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            group: row.get("group_name")?,
            student: row.get("student")?,
        })
    }
}

/// Q7: one grade row for a group and subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSubjectGrade {
    pub student: String,
    pub group: String,
    pub subject: String,
    pub grade: i64,
}

impl CatalogRow for GroupSubjectGrade {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student: row.get("student")?,
            group: row.get("group_name")?,
            subject: row.get("subject")?,
            grade: row.get("grade")?,
        })
    }
}

/// Q8: a teacher's average grade in one of their subjects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherSubjectAverage {
    pub teacher: String,
    pub subject: String,
    pub average: f64,
}

impl CatalogRow for TeacherSubjectAverage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            teacher: row.get("teacher")?,
            subject: row.get("subject")?,
            average: row.get("avg_grade")?,
        })
    }
}

/// Q9: a subject a student has been graded in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentCourse {
    pub student: String,
    pub subject: String,
}

impl CatalogRow for StudentCourse {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student: row.get("student")?,
            subject: row.get("subject")?,
        })
    }
}

/// Q10: a subject a student takes from a specific teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTeacherCourse {
    pub student: String,
    pub subject: String,
    pub teacher: String,
}

impl CatalogRow for StudentTeacherCourse {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student: row.get("student")?,
            subject: row.get("subject")?,
            teacher: row.get("teacher")?,
        })
    }
}

/// Q11: average grade a teacher has given a student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherStudentAverage {
    pub average: f64,
    pub teacher: String,
    pub student: String,
}

impl CatalogRow for TeacherStudentAverage {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            average: row.get("avg_grade")?,
            teacher: row.get("teacher")?,
            student: row.get("student")?,
        })
    }
}

/// Q12: a grade from the most recent lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastLessonGrade {
    pub subject: String,
    pub student: String,
    pub grade_date: NaiveDate,
    pub grade: i64,
}

impl CatalogRow for LastLessonGrade {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            subject: row.get("subject")?,
            student: row.get("student")?,
            grade_date: row.get("grade_date")?,
            grade: row.get("grade")?,
        })
    }
}

/// Type-erased result of any catalog query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    StudentAverages(Vec<StudentAverage>),
    BestStudent(Option<StudentAverage>),
    GroupAverages(Vec<GroupAverage>),
    OverallAverage(Option<f64>),
    TeacherCourses(Vec<TeacherCourse>),
    GroupMembers(Vec<GroupMember>),
    GroupSubjectGrades(Vec<GroupSubjectGrade>),
    TeacherSubjectAverages(Vec<TeacherSubjectAverage>),
    StudentCourses(Vec<StudentCourse>),
    StudentTeacherCourses(Vec<StudentTeacherCourse>),
    TeacherStudentAverage(Option<TeacherStudentAverage>),
    LastLessonGrades(Vec<LastLessonGrade>),
}

impl QueryOutput {
    /// Number of result rows; a scalar or single row counts as one
    pub fn row_count(&self) -> usize {
        match self {
            QueryOutput::StudentAverages(rows) => rows.len(),
            QueryOutput::BestStudent(row) => usize::from(row.is_some()),
            QueryOutput::GroupAverages(rows) => rows.len(),
            QueryOutput::OverallAverage(value) => usize::from(value.is_some()),
            QueryOutput::TeacherCourses(rows) => rows.len(),
            QueryOutput::GroupMembers(rows) => rows.len(),
            QueryOutput::GroupSubjectGrades(rows) => rows.len(),
            QueryOutput::TeacherSubjectAverages(rows) => rows.len(),
            QueryOutput::StudentCourses(rows) => rows.len(),
            QueryOutput::StudentTeacherCourses(rows) => rows.len(),
            QueryOutput::TeacherStudentAverage(row) => usize::from(row.is_some()),
            QueryOutput::LastLessonGrades(rows) => rows.len(),
        }
    }

    /// Plain-text lines, one per row
    pub fn lines(&self) -> Vec<String> {
        fn each<T>(rows: &[T], f: impl Fn(&T) -> String) -> Vec<String> {
            rows.iter().map(f).collect()
        }

        match self {
            QueryOutput::StudentAverages(rows) => each(rows, |r| format!("{}: {:.2}", r.student, r.average)),
            QueryOutput::BestStudent(row) => each(row.as_slice(), |r| format!("{}: {:.2}", r.student, r.average)),
            QueryOutput::GroupAverages(rows) => each(rows, |r| format!("{}: {:.2}", r.group, r.average)),
            QueryOutput::OverallAverage(value) => value.iter().map(|v| format!("{:.2}", v)).collect(),
            QueryOutput::TeacherCourses(rows) => each(rows, |r| format!("{}: {}", r.teacher, r.subject)),
            QueryOutput::GroupMembers(rows) => each(rows, |r| format!("{}: {}", r.group, r.student)),
            QueryOutput::GroupSubjectGrades(rows) => each(rows, |r| {
                format!("{} ({}) {}: {}", r.student, r.group, r.subject, r.grade)
            }),
            QueryOutput::TeacherSubjectAverages(rows) => each(rows, |r| {
                format!("{} / {}: {:.2}", r.teacher, r.subject, r.average)
            }),
            QueryOutput::StudentCourses(rows) => each(rows, |r| format!("{}: {}", r.student, r.subject)),
            QueryOutput::StudentTeacherCourses(rows) => each(rows, |r| {
                format!("{}: {} ({})", r.student, r.subject, r.teacher)
            }),
            QueryOutput::TeacherStudentAverage(row) => each(row.as_slice(), |r| {
                format!("{} -> {}: {:.2}", r.teacher, r.student, r.average)
            }),
            QueryOutput::LastLessonGrades(rows) => each(rows, |r| {
                format!("{} {} {}: {}", r.grade_date, r.subject, r.student, r.grade)
            }),
        }
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        if lines.is_empty() {
            return write!(f, "(no results)");
        }
        write!(f, "{}", lines.join("\n"))
    }
}
