/*!
 * Row generators for the seed batch.
 *
 * Every generator is a pure function of the configuration and the RNG.
 * Ids are dense from 1 in generation order, so foreign keys drawn from
 * `1..=count` always reference a generated row.
 */

use chrono::{NaiveDate, TimeDelta};
use rand::Rng;

use crate::app_config::{SeedConfig, MAX_SEED_GRADES};
use crate::database::{GradeRecord, GroupRecord, StudentRecord, SubjectRecord, TeacherRecord};

use super::names;

/// Teachers: exactly `config.teachers` rows
pub fn generate_teachers<R: Rng>(config: &SeedConfig, rng: &mut R) -> Vec<TeacherRecord> {
    (1..=config.teachers as i64)
        .map(|id| TeacherRecord::new(id, names::full_name(rng)))
        .collect()
}

/// Groups: one row per configured name
pub fn generate_groups(config: &SeedConfig) -> Vec<GroupRecord> {
    config
        .groups
        .iter()
        .zip(1..)
        .map(|(name, id)| GroupRecord::new(id, name.as_str()))
        .collect()
}

/// Subjects: one row per configured name, owner uniform over teachers
pub fn generate_subjects<R: Rng>(config: &SeedConfig, rng: &mut R) -> Vec<SubjectRecord> {
    let teachers = config.teachers as i64;
    config
        .subjects
        .iter()
        .zip(1..)
        .map(|(name, id)| SubjectRecord::new(id, name.as_str(), rng.random_range(1..=teachers)))
        .collect()
}

/// Students: exactly `config.students` rows, group uniform over groups
pub fn generate_students<R: Rng>(config: &SeedConfig, rng: &mut R) -> Vec<StudentRecord> {
    let groups = config.groups.len() as i64;
    (1..=config.students as i64)
        .map(|id| {
            let fullname = names::full_name(rng);
            StudentRecord::new(id, fullname, rng.random_range(1..=groups))
        })
        .collect()
}

/// Grades: a jittered count per student with random value, date and subject
pub fn generate_grades<R: Rng>(config: &SeedConfig, rng: &mut R, today: NaiveDate) -> Vec<GradeRecord> {
    let subjects = config.subjects.len() as i64;
    let earliest = config.earliest_grade_date(today).unwrap_or(NaiveDate::MIN);
    let capacity = config
        .students
        .saturating_mul(config.avg_grades)
        .min(MAX_SEED_GRADES);
    let mut grades = Vec::with_capacity(capacity);
    let mut next_id = 1;

    for student_id in 1..=config.students as i64 {
        let count = rng.random_range(config.min_grades_per_student()..=config.max_grades_per_student());
        for _ in 0..count {
            let days_ago = rng.random_range(0..=config.date_window_days);
            let grade_date = TimeDelta::try_days(days_ago)
                .and_then(|delta| today.checked_sub_signed(delta))
                .unwrap_or(earliest);
            grades.push(GradeRecord::new(
                next_id,
                rng.random_range(config.min_grade..=config.max_grade),
                grade_date,
                student_id,
                rng.random_range(1..=subjects),
            ));
            next_id += 1;
        }
    }

    grades
}

/// A complete generated dataset, ready to stage
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDataset {
    pub teachers: Vec<TeacherRecord>,
    pub groups: Vec<GroupRecord>,
    pub subjects: Vec<SubjectRecord>,
    pub students: Vec<StudentRecord>,
    pub grades: Vec<GradeRecord>,
}

impl SeedDataset {
    /// Run every generator against one RNG
    ///
    /// The config must already be validated: empty ranges would panic in
    /// the RNG.
    pub fn generate<R: Rng>(config: &SeedConfig, rng: &mut R, today: NaiveDate) -> Self {
        let teachers = generate_teachers(config, rng);
        let groups = generate_groups(config);
        let subjects = generate_subjects(config, rng);
        let students = generate_students(config, rng);
        let grades = generate_grades(config, rng, today);

        Self {
            teachers,
            groups,
            subjects,
            students,
            grades,
        }
    }

    /// Total rows across all entities
    pub fn len(&self) -> usize {
        self.teachers.len() + self.groups.len() + self.subjects.len() + self.students.len() + self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
