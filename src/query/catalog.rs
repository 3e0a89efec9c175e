/*!
 * The query catalog: twelve read-only analytical queries.
 *
 * Each method builds its `SelectQuery`, renders it and maps the rows. No
 * method writes. Unknown ids behave like ids with no matches unless strict
 * id checking is switched on.
 */

use log::debug;
use rusqlite::Connection;

use crate::database::{DatabaseConnection, EntityKind, Repository};
use crate::errors::QueryError;

use super::plan::{RenderedQuery, SelectQuery};
use super::plans;
use super::registry::QueryId;
use super::rows::{
    CatalogRow, GroupAverage, GroupMember, GroupSubjectGrade, LastLessonGrade, QueryOutput,
    StudentAverage, StudentCourse, StudentTeacherCourse, TeacherCourse, TeacherStudentAverage,
    TeacherSubjectAverage,
};

/// Read-only access to the twelve catalog queries
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
    strict_ids: bool,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            strict_ids: false,
        }
    }

    /// Reject ids with no row instead of returning empty results
    pub fn with_strict_ids(mut self, strict_ids: bool) -> Self {
        self.strict_ids = strict_ids;
        self
    }

    pub fn strict_ids(&self) -> bool {
        self.strict_ids
    }

    fn fetch_all<T: CatalogRow>(
        &self,
        plan: SelectQuery,
        ids: &[(EntityKind, i64)],
    ) -> Result<Vec<T>, QueryError> {
        let rendered = checked_render(&plan)?;
        self.db.read(|conn| {
            self.check_ids(conn, ids)?;
            Ok(rendered.query_map(conn, T::from_row)?)
        })
    }

    fn fetch_optional<T: CatalogRow>(
        &self,
        plan: SelectQuery,
        ids: &[(EntityKind, i64)],
    ) -> Result<Option<T>, QueryError> {
        Ok(self.fetch_all(plan, ids)?.into_iter().next())
    }

    fn check_ids(&self, conn: &Connection, ids: &[(EntityKind, i64)]) -> Result<(), QueryError> {
        if !self.strict_ids {
            return Ok(());
        }
        for &(kind, id) in ids {
            if !Repository::exists_sync(conn, kind, id)? {
                debug!("Strict id check failed for {} {}", kind, id);
                return Err(QueryError::UnknownId { kind, id });
            }
        }
        Ok(())
    }

    /// Q1: top five students by average across all subjects
    pub fn top_students(&self) -> Result<Vec<StudentAverage>, QueryError> {
        self.fetch_all(plans::top_students(), &[])
    }

    /// Q2: student with the highest average in a subject
    pub fn best_student_in_subject(&self, subject_id: i64) -> Result<Option<StudentAverage>, QueryError> {
        self.fetch_optional(
            plans::best_student_in_subject(subject_id),
            &[(EntityKind::Subject, subject_id)],
        )
    }

    /// Q3: average per group within a subject, best first
    pub fn group_averages_for_subject(&self, subject_id: i64) -> Result<Vec<GroupAverage>, QueryError> {
        self.fetch_all(
            plans::group_averages_for_subject(subject_id),
            &[(EntityKind::Subject, subject_id)],
        )
    }

    /// Q4: average over all grades; `None` when there are no grades
    pub fn overall_average(&self) -> Result<Option<f64>, QueryError> {
        let rendered = checked_render(&plans::overall_average())?;
        self.db.read(|conn| {
            let values = rendered.query_map(conn, |row| row.get::<_, Option<f64>>("avg_grade"))?;
            Ok(values.into_iter().next().flatten())
        })
    }

    /// Q5: subjects taught by a teacher
    pub fn teacher_courses(&self, teacher_id: i64) -> Result<Vec<TeacherCourse>, QueryError> {
        self.fetch_all(
            plans::teacher_courses(teacher_id),
            &[(EntityKind::Teacher, teacher_id)],
        )
    }

    /// Q6: up to ten students of a group
    pub fn group_roster(&self, group_id: i64) -> Result<Vec<GroupMember>, QueryError> {
        self.fetch_all(plans::group_roster(group_id), &[(EntityKind::Group, group_id)])
    }

    /// Q7: up to five grade rows for a group in a subject
    pub fn group_subject_grades(
        &self,
        group_id: i64,
        subject_id: i64,
    ) -> Result<Vec<GroupSubjectGrade>, QueryError> {
        self.fetch_all(
            plans::group_subject_grades(group_id, subject_id),
            &[(EntityKind::Group, group_id), (EntityKind::Subject, subject_id)],
        )
    }

    /// Q8: a teacher's average per subject they teach
    pub fn teacher_subject_averages(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherSubjectAverage>, QueryError> {
        self.fetch_all(
            plans::teacher_subject_averages(teacher_id),
            &[(EntityKind::Teacher, teacher_id)],
        )
    }

    /// Q9: subjects a student has any grade in
    pub fn student_courses(&self, student_id: i64) -> Result<Vec<StudentCourse>, QueryError> {
        self.fetch_all(
            plans::student_courses(student_id),
            &[(EntityKind::Student, student_id)],
        )
    }

    /// Q10: subjects a student takes from a teacher
    pub fn student_courses_by_teacher(
        &self,
        student_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<StudentTeacherCourse>, QueryError> {
        self.fetch_all(
            plans::student_courses_by_teacher(student_id, teacher_id),
            &[(EntityKind::Student, student_id), (EntityKind::Teacher, teacher_id)],
        )
    }

    /// Q11: average grade a teacher has given a student
    pub fn teacher_student_average(
        &self,
        student_id: i64,
        teacher_id: i64,
    ) -> Result<Option<TeacherStudentAverage>, QueryError> {
        self.fetch_optional(
            plans::teacher_student_average(student_id, teacher_id),
            &[(EntityKind::Student, student_id), (EntityKind::Teacher, teacher_id)],
        )
    }

    /// Q12: all grades from the latest lesson of a subject in a group
    pub fn last_lesson_grades(
        &self,
        subject_id: i64,
        group_id: i64,
    ) -> Result<Vec<LastLessonGrade>, QueryError> {
        self.fetch_all(
            plans::last_lesson_grades(subject_id, group_id),
            &[(EntityKind::Subject, subject_id), (EntityKind::Group, group_id)],
        )
    }

    /// Run a query by id with positional id arguments
    pub fn run(&self, id: QueryId, args: &[i64]) -> Result<QueryOutput, QueryError> {
        check_arity(id, args)?;

        let output = match id {
            QueryId::TopStudents => QueryOutput::StudentAverages(self.top_students()?),
            QueryId::BestStudentInSubject => {
                QueryOutput::BestStudent(self.best_student_in_subject(args[0])?)
            }
            QueryId::GroupAveragesForSubject => {
                QueryOutput::GroupAverages(self.group_averages_for_subject(args[0])?)
            }
            QueryId::OverallAverage => QueryOutput::OverallAverage(self.overall_average()?),
            QueryId::TeacherCourses => QueryOutput::TeacherCourses(self.teacher_courses(args[0])?),
            QueryId::GroupRoster => QueryOutput::GroupMembers(self.group_roster(args[0])?),
            QueryId::GroupSubjectGrades => {
                QueryOutput::GroupSubjectGrades(self.group_subject_grades(args[0], args[1])?)
            }
            QueryId::TeacherSubjectAverages => {
                QueryOutput::TeacherSubjectAverages(self.teacher_subject_averages(args[0])?)
            }
            QueryId::StudentCourses => QueryOutput::StudentCourses(self.student_courses(args[0])?),
            QueryId::StudentCoursesByTeacher => QueryOutput::StudentTeacherCourses(
                self.student_courses_by_teacher(args[0], args[1])?,
            ),
            QueryId::TeacherStudentAverage => {
                QueryOutput::TeacherStudentAverage(self.teacher_student_average(args[0], args[1])?)
            }
            QueryId::LastLessonGrades => {
                QueryOutput::LastLessonGrades(self.last_lesson_grades(args[0], args[1])?)
            }
        };

        debug!("{} returned {} row(s)", id, output.row_count());
        Ok(output)
    }

    /// Rendered SQL and parameters for a query, without running it
    pub fn explain(id: QueryId, args: &[i64]) -> Result<RenderedQuery, QueryError> {
        checked_render(&Self::plan(id, args)?)
    }

    /// Query description for a query id
    pub fn plan(id: QueryId, args: &[i64]) -> Result<SelectQuery, QueryError> {
        check_arity(id, args)?;

        let plan = match id {
            QueryId::TopStudents => plans::top_students(),
            QueryId::BestStudentInSubject => plans::best_student_in_subject(args[0]),
            QueryId::GroupAveragesForSubject => plans::group_averages_for_subject(args[0]),
            QueryId::OverallAverage => plans::overall_average(),
            QueryId::TeacherCourses => plans::teacher_courses(args[0]),
            QueryId::GroupRoster => plans::group_roster(args[0]),
            QueryId::GroupSubjectGrades => plans::group_subject_grades(args[0], args[1]),
            QueryId::TeacherSubjectAverages => plans::teacher_subject_averages(args[0]),
            QueryId::StudentCourses => plans::student_courses(args[0]),
            QueryId::StudentCoursesByTeacher => plans::student_courses_by_teacher(args[0], args[1]),
            QueryId::TeacherStudentAverage => plans::teacher_student_average(args[0], args[1]),
            QueryId::LastLessonGrades => plans::last_lesson_grades(args[0], args[1]),
        };

        plan.validate().map_err(QueryError::InvalidPlan)?;
        Ok(plan)
    }
}

/// Render a description only after its columns and aliases check out
fn checked_render(plan: &SelectQuery) -> Result<RenderedQuery, QueryError> {
    plan.validate().map_err(QueryError::InvalidPlan)?;
    Ok(plan.render())
}

fn check_arity(id: QueryId, args: &[i64]) -> Result<(), QueryError> {
    let expected = id.params().len();
    if args.len() != expected {
        return Err(QueryError::InvalidArguments(format!(
            "{} expects {} argument(s), got {}; usage: {}",
            id,
            expected,
            args.len(),
            id.usage()
        )));
    }
    Ok(())
}
