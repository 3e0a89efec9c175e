/*!
 * Tests for application configuration functionality
 */

use gradebook::app_config::{Config, LogLevel, SeedConfig, MAX_DATE_WINDOW_DAYS, MAX_SEED_GRADES};
use std::path::PathBuf;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.database_path, None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.seed.teachers, 5);
    assert_eq!(config.seed.students, 50);
    assert_eq!(config.seed.avg_grades, 20);
    assert_eq!(config.seed.grade_jitter, 3);
    assert_eq!((config.seed.min_grade, config.seed.max_grade), (1, 12));
    assert_eq!(config.seed.subjects.len(), 8);
    assert_eq!(config.seed.groups, vec!["БЛБ-31", "БЛБ-32", "БЛБ-33"]);
    assert_eq!(config.seed.rng_seed, None);
}

#[test]
fn test_seedConfig_validate_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = SeedConfig::default();
    assert!(config.validate().is_ok());

    config.teachers = 0;
    assert!(config.validate().is_err());
    config.teachers = 5;

    config.subjects.clear();
    assert!(config.validate().is_err());
    config.subjects = SeedConfig::default().subjects;

    config.groups.clear();
    assert!(config.validate().is_err());
    config.groups = vec!["A".to_string(), "A".to_string()];
    assert!(config.validate().is_err());
    config.groups = SeedConfig::default().groups;

    config.min_grade = 13;
    assert!(config.validate().is_err());
    config.min_grade = 1;

    config.date_window_days = -1;
    assert!(config.validate().is_err());
    config.date_window_days = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_seedConfig_gradesPerStudent_shouldSaturateAtZero() {
    let config = SeedConfig {
        avg_grades: 2,
        grade_jitter: 5,
        ..SeedConfig::default()
    };

    assert_eq!(config.min_grades_per_student(), 0);
    assert_eq!(config.max_grades_per_student(), 7);
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{ "log_level": "debug", "seed": { "students": 8 } }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.seed.students, 8);
    assert_eq!(config.seed.teachers, 5);
    assert_eq!(config.database_path, None);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_resolvedDatabasePath_withExplicitPath_shouldUseIt() {
    let config = Config {
        database_path: Some(PathBuf::from("/tmp/records.db")),
        ..Config::default()
    };

    assert_eq!(config.resolved_database_path().unwrap(), PathBuf::from("/tmp/records.db"));
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

#[test]
fn test_seedConfig_validate_withOversizedWindow_shouldFail() {
    let mut config = SeedConfig::default();

    config.date_window_days = MAX_DATE_WINDOW_DAYS;
    assert!(config.validate().is_ok());

    config.date_window_days = 1_000_000_000;
    assert!(config.validate().is_err());
}

#[test]
fn test_seedConfig_validate_withTooManyGrades_shouldFail() {
    let config = SeedConfig {
        students: MAX_SEED_GRADES,
        avg_grades: 2,
        grade_jitter: 0,
        ..SeedConfig::default()
    };
    assert!(config.validate().is_err());

    let config = SeedConfig {
        avg_grades: usize::MAX,
        grade_jitter: 1,
        ..SeedConfig::default()
    };
    assert!(config.validate().is_err());
    assert_eq!(config.max_grades_per_student(), usize::MAX);
}

#[test]
fn test_seedConfig_earliestGradeDate_shouldBeCheckedAgainstToday() {
    let config = SeedConfig::default();

    assert_eq!(
        config.earliest_grade_date(common::date(2024, 12, 31)),
        Some(common::date(2024, 1, 1))
    );
    assert_eq!(config.earliest_grade_date(chrono::NaiveDate::MIN), None);
}
