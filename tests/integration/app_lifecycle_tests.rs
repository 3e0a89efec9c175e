/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use gradebook::app_config::Config;
use gradebook::app_controller::{Controller, REPORT_RULE};
use gradebook::errors::{AppError, QueryError};
use gradebook::query::QueryId;
use gradebook::seed::SeedOptions;

use crate::common;

fn seeded_controller() -> Result<Controller> {
    let controller = Controller::new_for_test()?;
    controller.seed(&SeedOptions {
        rng_seed: Some(17),
        today: Some(common::fixed_today()),
        ..SeedOptions::default()
    })?;
    Ok(controller)
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldStartEmpty() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert!(controller.database().is_in_memory());
    assert_eq!(controller.stats()?.total_rows(), 0);
    Ok(())
}

/// Test the controller with a configured database file
#[test]
fn test_controller_withConfiguredPath_shouldCreateDatabaseFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("data").join("gradebook.db");
    let config = Config {
        database_path: Some(path.clone()),
        ..Config::default()
    };

    let controller = Controller::with_config(config)?;

    assert!(path.exists());
    assert_eq!(controller.database().path(), path.as_path());
    Ok(())
}

#[test]
fn test_seed_shouldUseConfiguredCounts() -> Result<()> {
    let controller = seeded_controller()?;

    let stats = controller.stats()?;

    assert_eq!(stats.teacher_count, 5);
    assert_eq!(stats.student_count, 50);
    assert_eq!(stats.group_count, 3);
    assert_eq!(stats.subject_count, 8);
    Ok(())
}

#[test]
fn test_report_shouldCoverEveryQueryWithRules() -> Result<()> {
    let controller = seeded_controller()?;

    let sections = controller.report()?;
    let text = Controller::format_report(&sections);

    assert_eq!(sections.len(), 12);
    assert_eq!(text.matches(REPORT_RULE).count(), 11);
    assert_eq!(REPORT_RULE.len(), 50);
    for id in QueryId::ALL {
        assert!(text.contains(id.description()), "{}", id);
    }
    Ok(())
}

#[test]
fn test_runQuery_withWrongArity_shouldReturnQueryError() -> Result<()> {
    let controller = seeded_controller()?;

    let result = controller.run_query(QueryId::TeacherStudentAverage, &[1], false);

    assert!(matches!(
        result,
        Err(AppError::Query(QueryError::InvalidArguments(_)))
    ));
    Ok(())
}

#[test]
fn test_runQuery_strict_shouldRejectUnknownStudent() -> Result<()> {
    let controller = seeded_controller()?;

    assert!(controller.run_query(QueryId::StudentCourses, &[9999], true).is_err());
    assert_eq!(
        controller.run_query(QueryId::StudentCourses, &[9999], false)?.row_count(),
        0
    );
    Ok(())
}

#[test]
fn test_runQuery_json_shouldSerializeRows() -> Result<()> {
    let controller = seeded_controller()?;

    let output = controller.run_query(QueryId::TopStudents, &[], false)?;
    let json: serde_json::Value = serde_json::to_value(&output)?;

    let rows = json.as_array().expect("array of rows");
    assert_eq!(rows.len(), 5);
    assert!(rows[0].get("student").is_some());
    assert!(rows[0].get("average").is_some());
    Ok(())
}
