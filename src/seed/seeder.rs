/*!
 * Seed batch: generate a dataset and stage it as one unit of work.
 */

use chrono::NaiveDate;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::app_config::SeedConfig;
use crate::database::{DatabaseConnection, Repository};
use crate::errors::SeedError;

use super::generator::SeedDataset;

/// Caller choices that are not part of the dataset shape
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    /// Delete existing rows inside the same transaction before staging
    pub reset: bool,
    /// Overrides `SeedConfig::rng_seed`
    pub rng_seed: Option<u64>,
    /// Overrides the reference date grades are generated back from
    pub today: Option<NaiveDate>,
}

/// Rows committed per table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub teachers: usize,
    pub groups: usize,
    pub subjects: usize,
    pub students: usize,
    pub grades: usize,
    /// Rows removed first when `reset` was requested
    pub deleted: usize,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} teachers, {} groups, {} subjects, {} students, {} grades",
            self.teachers, self.groups, self.subjects, self.students, self.grades
        )
    }
}

/// Seed the database from configuration
pub fn seed_database(
    db: &DatabaseConnection,
    config: &SeedConfig,
    options: &SeedOptions,
) -> Result<SeedReport, SeedError> {
    let mut rng = match options.rng_seed.or(config.rng_seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let today = options
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    seed_with_rng(db, config, options, &mut rng, today)
}

/// Seed the database with an explicit RNG and reference date
///
/// Either every generated row is committed or none is.
pub fn seed_with_rng<R: Rng>(
    db: &DatabaseConnection,
    config: &SeedConfig,
    options: &SeedOptions,
    rng: &mut R,
    today: NaiveDate,
) -> Result<SeedReport, SeedError> {
    config.validate().map_err(SeedError::InvalidConfig)?;
    if config.earliest_grade_date(today).is_none() {
        return Err(SeedError::InvalidConfig(format!(
            "a {} day window before {} is out of the supported date range",
            config.date_window_days, today
        )));
    }

    let dataset = SeedDataset::generate(config, rng, today);
    info!("Generated {} rows, staging seed batch", dataset.len());

    let report = db.transaction(|tx| stage_dataset(tx, &dataset, options.reset))?;

    info!("Seed batch committed: {}", report);
    Ok(report)
}

/// Stage every table in foreign-key order; never commits
fn stage_dataset(
    conn: &rusqlite::Connection,
    dataset: &SeedDataset,
    reset: bool,
) -> Result<SeedReport, SeedError> {
    let deleted = if reset {
        Repository::delete_all(conn)?
    } else {
        if !Repository::is_empty_sync(conn)? {
            return Err(SeedError::DatabaseNotEmpty);
        }
        0
    };

    Ok(SeedReport {
        teachers: Repository::insert_teachers(conn, &dataset.teachers)?,
        groups: Repository::insert_groups(conn, &dataset.groups)?,
        subjects: Repository::insert_subjects(conn, &dataset.subjects)?,
        students: Repository::insert_students(conn, &dataset.students)?,
        grades: Repository::insert_grades(conn, &dataset.grades)?,
        deleted,
    })
}
