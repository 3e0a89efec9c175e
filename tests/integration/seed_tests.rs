/*!
 * Integration tests for seeding on-disk databases
 */

use anyhow::Result;
use gradebook::database::{DatabaseConnection, Repository};
use gradebook::errors::SeedError;
use gradebook::query::Catalog;
use gradebook::seed::{seed_database, SeedOptions};

use crate::common;

fn options(rng_seed: u64) -> SeedOptions {
    common::init_logging();
    SeedOptions {
        rng_seed: Some(rng_seed),
        today: Some(common::fixed_today()),
        ..SeedOptions::default()
    }
}

#[test]
fn test_seedDatabase_onDisk_shouldPersistAcrossConnections() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("records.db");
    let config = common::small_seed_config();

    let report = {
        let db = DatabaseConnection::new(&path)?;
        seed_database(&db, &config, &options(1))?
    };

    let reopened = DatabaseConnection::new(&path)?;
    let stats = reopened.stats()?;
    assert_eq!(stats.teacher_count as usize, report.teachers);
    assert_eq!(stats.student_count as usize, report.students);
    assert_eq!(stats.grade_count as usize, report.grades);
    assert!(stats.file_size_bytes > 0);
    Ok(())
}

#[test]
fn test_seedDatabase_shouldSatisfyReferentialRanges() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    let config = common::small_seed_config();
    seed_database(&db, &config, &options(5))?;

    let repo = Repository::new(db);
    let groups = config.groups.len() as i64;
    let teachers = config.teachers as i64;

    assert!(repo.list_students()?.iter().all(|s| (1..=groups).contains(&s.group_id)));
    assert!(repo.list_subjects()?.iter().all(|s| (1..=teachers).contains(&s.teacher_id)));
    assert!(repo.list_grades()?.iter().all(|g| (1..=12).contains(&g.grade)));
    Ok(())
}

#[test]
fn test_seedDatabase_sameSeed_shouldProduceSameRows() -> Result<()> {
    let config = common::small_seed_config();
    let first = DatabaseConnection::new_in_memory()?;
    let second = DatabaseConnection::new_in_memory()?;

    seed_database(&first, &config, &options(99))?;
    seed_database(&second, &config, &options(99))?;

    assert_eq!(Repository::new(first).list_grades()?, Repository::new(second).list_grades()?);
    Ok(())
}

#[test]
fn test_seedDatabase_twiceWithoutReset_shouldKeepFirstBatch() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    let config = common::small_seed_config();
    seed_database(&db, &config, &options(1))?;
    let before = db.stats()?;

    let result = seed_database(&db, &config, &options(2));

    assert!(matches!(result, Err(SeedError::DatabaseNotEmpty)));
    assert_eq!(db.stats()?, before);
    Ok(())
}

#[test]
fn test_seedDatabase_withReset_shouldReplaceRows() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    common::stage_fixture(&db)?;

    let report = seed_database(
        &db,
        &common::small_seed_config(),
        &SeedOptions {
            reset: true,
            ..options(3)
        },
    )?;

    assert_eq!(report.deleted, 8);
    assert_eq!(db.stats()?.student_count, 12);
    Ok(())
}

#[test]
fn test_seededDatabase_queries_shouldRespectLimits() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    let config = gradebook::app_config::SeedConfig {
        rng_seed: Some(21),
        ..Default::default()
    };
    seed_database(&db, &config, &options(21))?;
    let catalog = Catalog::new(db);

    assert_eq!(catalog.top_students()?.len(), 5);
    for group_id in 1..=3 {
        assert!(catalog.group_roster(group_id)?.len() <= 10);
        for subject_id in 1..=8 {
            assert!(catalog.group_subject_grades(group_id, subject_id)?.len() <= 5);
        }
    }
    let overall = catalog.overall_average()?.expect("seeded grades");
    assert!((1.0..=12.0).contains(&overall));
    Ok(())
}

#[test]
fn test_seededDatabase_topStudents_shouldBeSortedDescending() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    seed_database(&db, &common::small_seed_config(), &options(8))?;
    let catalog = Catalog::new(db);

    let top = catalog.top_students()?;

    assert!(top.windows(2).all(|pair| pair[0].average >= pair[1].average));
    Ok(())
}
