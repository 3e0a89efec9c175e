/*!
 * Round-trip tests: every catalog query against a hand-built fixture
 */

use anyhow::Result;
use gradebook::database::{DatabaseConnection, EntityKind, GradeRecord, Repository};
use gradebook::errors::QueryError;
use gradebook::query::{
    Catalog, GroupAverage, GroupMember, LastLessonGrade, QueryId, QueryOutput, StudentAverage,
    StudentCourse, StudentTeacherCourse, TeacherCourse, TeacherStudentAverage,
    TeacherSubjectAverage,
};

use crate::common::{self, date};

fn fixture_catalog() -> Result<Catalog> {
    Ok(Catalog::new(common::fixture_database()?))
}

fn average(student: &str, average: f64) -> StudentAverage {
    StudentAverage {
        student: student.to_string(),
        average,
    }
}

#[test]
fn test_topStudents_withFixture_shouldRankByAverage() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.top_students()?,
        vec![average("Olena Petrenko", 9.0), average("Taras Shevchenko", 7.0)]
    );
    Ok(())
}

#[test]
fn test_bestStudentInSubject_withFixture_shouldReturnOlena() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(catalog.best_student_in_subject(1)?, Some(average("Olena Petrenko", 9.0)));
    assert_eq!(catalog.best_student_in_subject(99)?, None);
    Ok(())
}

#[test]
fn test_groupAveragesForSubject_withFixture_shouldRoundToTwoPlaces() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.group_averages_for_subject(1)?,
        vec![GroupAverage {
            group: "БЛБ-31".to_string(),
            average: 8.33,
        }]
    );
    Ok(())
}

#[test]
fn test_overallAverage_withFixture_shouldAverageEveryGrade() -> Result<()> {
    let catalog = fixture_catalog()?;
    assert_eq!(catalog.overall_average()?, Some(8.33));
    Ok(())
}

#[test]
fn test_overallAverage_withEmptyDatabase_shouldReturnNone() -> Result<()> {
    let catalog = Catalog::new(DatabaseConnection::new_in_memory()?);
    assert_eq!(catalog.overall_average()?, None);
    assert!(catalog.top_students()?.is_empty());
    Ok(())
}

#[test]
fn test_teacherCourses_withFixture_shouldListMathematics() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.teacher_courses(1)?,
        vec![TeacherCourse {
            teacher: "Ivan Franko".to_string(),
            subject: "математика".to_string(),
        }]
    );
    Ok(())
}

#[test]
fn test_groupRoster_withFixture_shouldListBothStudents() -> Result<()> {
    let catalog = fixture_catalog()?;

    let roster = catalog.group_roster(1)?;

    assert_eq!(
        roster,
        vec![
            GroupMember {
                group: "БЛБ-31".to_string(),
                student: "Olena Petrenko".to_string(),
            },
            GroupMember {
                group: "БЛБ-31".to_string(),
                student: "Taras Shevchenko".to_string(),
            },
        ]
    );
    Ok(())
}

#[test]
fn test_groupSubjectGrades_withFixture_shouldReturnAllThreeGrades() -> Result<()> {
    let catalog = fixture_catalog()?;

    let grades: Vec<i64> = catalog.group_subject_grades(1, 1)?.iter().map(|g| g.grade).collect();

    assert_eq!(grades, vec![10, 8, 7]);
    Ok(())
}

#[test]
fn test_teacherSubjectAverages_withFixture_shouldAverageSubject() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.teacher_subject_averages(1)?,
        vec![TeacherSubjectAverage {
            teacher: "Ivan Franko".to_string(),
            subject: "математика".to_string(),
            average: 8.33,
        }]
    );
    Ok(())
}

#[test]
fn test_studentCourses_withFixture_shouldDeduplicateSubjects() -> Result<()> {
    let catalog = fixture_catalog()?;

    // Olena has two grades in the same subject
    assert_eq!(
        catalog.student_courses(1)?,
        vec![StudentCourse {
            student: "Olena Petrenko".to_string(),
            subject: "математика".to_string(),
        }]
    );
    Ok(())
}

#[test]
fn test_studentCoursesByTeacher_withFixture_shouldIncludeTeacher() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.student_courses_by_teacher(2, 1)?,
        vec![StudentTeacherCourse {
            student: "Taras Shevchenko".to_string(),
            subject: "математика".to_string(),
            teacher: "Ivan Franko".to_string(),
        }]
    );
    assert!(catalog.student_courses_by_teacher(2, 5)?.is_empty());
    Ok(())
}

#[test]
fn test_teacherStudentAverage_withFixture_shouldAverageOlenasGrades() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.teacher_student_average(1, 1)?,
        Some(TeacherStudentAverage {
            average: 9.0,
            teacher: "Ivan Franko".to_string(),
            student: "Olena Petrenko".to_string(),
        })
    );
    assert_eq!(catalog.teacher_student_average(1, 2)?, None);
    Ok(())
}

#[test]
fn test_lastLessonGrades_withFixture_shouldReturnEveryRowOnLatestDate() -> Result<()> {
    let catalog = fixture_catalog()?;

    assert_eq!(
        catalog.last_lesson_grades(1, 1)?,
        vec![
            LastLessonGrade {
                subject: "математика".to_string(),
                student: "Olena Petrenko".to_string(),
                grade_date: date(2024, 5, 10),
                grade: 8,
            },
            LastLessonGrade {
                subject: "математика".to_string(),
                student: "Taras Shevchenko".to_string(),
                grade_date: date(2024, 5, 10),
                grade: 7,
            },
        ]
    );
    Ok(())
}

#[test]
fn test_lastLessonGrades_withNoGrades_shouldBeEmpty() -> Result<()> {
    let catalog = fixture_catalog()?;
    assert!(catalog.last_lesson_grades(1, 2)?.is_empty());
    Ok(())
}

#[test]
fn test_lastLessonGrades_afterNewLesson_shouldOnlyReturnNewestDate() -> Result<()> {
    let db = common::fixture_database()?;
    db.transaction(|tx| -> Result<()> {
        Repository::insert_grades(tx, &[GradeRecord::new(4, 11, date(2024, 5, 20), 2, 1)])?;
        Ok(())
    })?;
    let catalog = Catalog::new(db);

    let rows = catalog.last_lesson_grades(1, 1)?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].student, "Taras Shevchenko");
    assert_eq!(rows[0].grade, 11);
    Ok(())
}

#[test]
fn test_run_twice_shouldBeIdempotent() -> Result<()> {
    let catalog = fixture_catalog()?;

    for id in QueryId::ALL {
        let first = catalog.run(id, id.sample_args())?;
        let second = catalog.run(id, id.sample_args())?;
        assert_eq!(first, second, "{}", id);
    }
    Ok(())
}

#[test]
fn test_run_withUnknownIds_shouldReturnEmptyNotError() -> Result<()> {
    let catalog = fixture_catalog()?;

    let output = catalog.run(QueryId::GroupRoster, &[404])?;

    assert_eq!(output, QueryOutput::GroupMembers(Vec::new()));
    Ok(())
}

#[test]
fn test_run_strict_withUnknownIds_shouldFail() -> Result<()> {
    let catalog = fixture_catalog()?.with_strict_ids(true);

    let result = catalog.run(QueryId::LastLessonGrades, &[1, 404]);

    assert!(matches!(
        result,
        Err(QueryError::UnknownId {
            kind: EntityKind::Group,
            id: 404
        })
    ));
    assert_eq!(catalog.run(QueryId::LastLessonGrades, &[1, 1])?.row_count(), 2);
    Ok(())
}

#[test]
fn test_queries_shouldNotWrite() -> Result<()> {
    let db = common::fixture_database()?;
    let before = db.stats()?;
    let catalog = Catalog::new(db.clone());

    for id in QueryId::ALL {
        catalog.run(id, id.sample_args())?;
    }

    assert_eq!(db.stats()?, before);
    Ok(())
}
