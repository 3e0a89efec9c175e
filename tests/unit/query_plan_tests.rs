/*!
 * Tests for the query registry and SQL rendering
 */

use gradebook::errors::QueryError;
use gradebook::query::{Catalog, QueryId};

#[test]
fn test_registry_shouldNumberQueriesOneToTwelve() {
    let numbers: Vec<u8> = QueryId::ALL.iter().map(|id| id.number()).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<u8>>());
}

#[test]
fn test_registry_descriptions_shouldBeDistinct() {
    let mut descriptions: Vec<&str> = QueryId::ALL.iter().map(|id| id.description()).collect();
    descriptions.sort();
    descriptions.dedup();
    assert_eq!(descriptions.len(), 12);
}

#[test]
fn test_explain_everyQuery_shouldBindOneParamPerArgument() {
    for id in QueryId::ALL {
        let rendered = Catalog::explain(id, id.sample_args()).unwrap();
        let placeholders = rendered.sql.matches('?').count();

        assert_eq!(placeholders, rendered.params.len(), "{}", id);
        if id != QueryId::LastLessonGrades {
            assert_eq!(rendered.params, id.sample_args(), "{}", id);
        }
    }
}

#[test]
fn test_explain_shouldNeverInlineIds() {
    let rendered = Catalog::explain(QueryId::StudentCoursesByTeacher, &[987654, 123456]).unwrap();

    assert!(!rendered.sql.contains("987654"));
    assert_eq!(rendered.params, vec![987654, 123456]);
}

#[test]
fn test_explain_averages_shouldRoundInSql() {
    for id in [
        QueryId::TopStudents,
        QueryId::BestStudentInSubject,
        QueryId::GroupAveragesForSubject,
        QueryId::OverallAverage,
        QueryId::TeacherSubjectAverages,
        QueryId::TeacherStudentAverage,
    ] {
        let rendered = Catalog::explain(id, id.sample_args()).unwrap();
        assert!(rendered.sql.contains("ROUND(AVG(gr.grade), 2)"), "{}", id);
    }
}

#[test]
fn test_explain_withMissingArgument_shouldFail() {
    let result = Catalog::explain(QueryId::LastLessonGrades, &[1]);
    assert!(matches!(result, Err(QueryError::InvalidArguments(_))));

    let result = Catalog::explain(QueryId::TopStudents, &[1]);
    assert!(matches!(result, Err(QueryError::InvalidArguments(_))));
}
