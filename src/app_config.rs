use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Database file; `None` resolves to the per-user data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Seed generator settings
    #[serde(default)]
    pub seed: SeedConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Longest grade date window, about a century
pub const MAX_DATE_WINDOW_DAYS: i64 = 36_525;

/// Upper bound on grades a single seed batch may generate
pub const MAX_SEED_GRADES: usize = 10_000_000;

/// Settings for the synthetic data generator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeedConfig {
    /// Number of teachers to generate
    #[serde(default = "default_teachers")]
    pub teachers: usize,

    /// Number of students to generate
    #[serde(default = "default_students")]
    pub students: usize,

    /// Average number of grades per student
    #[serde(default = "default_avg_grades")]
    pub avg_grades: usize,

    /// Per-student grade count varies uniformly by up to this much
    #[serde(default = "default_grade_jitter")]
    pub grade_jitter: usize,

    /// Lowest grade value the generator emits
    #[serde(default = "default_min_grade")]
    pub min_grade: i64,

    /// Highest grade value the generator emits
    #[serde(default = "default_max_grade")]
    pub max_grade: i64,

    /// Grade dates fall within this many days before today
    #[serde(default = "default_date_window_days")]
    pub date_window_days: i64,

    /// Subject names, one subject row each
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,

    /// Group names, one group row each
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    /// Fixed RNG seed for reproducible datasets
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: default_teachers(),
            students: default_students(),
            avg_grades: default_avg_grades(),
            grade_jitter: default_grade_jitter(),
            min_grade: default_min_grade(),
            max_grade: default_max_grade(),
            date_window_days: default_date_window_days(),
            subjects: default_subjects(),
            groups: default_groups(),
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    /// Validate that the generator can produce a referentially valid dataset
    pub fn validate(&self) -> Result<(), String> {
        if self.teachers == 0 && !self.subjects.is_empty() {
            return Err("at least one teacher is required to own subjects".to_string());
        }
        if self.subjects.is_empty() && self.avg_grades + self.grade_jitter > 0 && self.students > 0 {
            return Err("grades need at least one subject".to_string());
        }
        if self.groups.is_empty() && self.students > 0 {
            return Err("students need at least one group".to_string());
        }
        if self.min_grade > self.max_grade {
            return Err(format!(
                "grade range is inverted: {} > {}",
                self.min_grade, self.max_grade
            ));
        }
        if self.date_window_days < 0 {
            return Err(format!(
                "date window must not be negative, got {}",
                self.date_window_days
            ));
        }
        if self.date_window_days > MAX_DATE_WINDOW_DAYS {
            return Err(format!(
                "date window must not exceed {} days, got {}",
                MAX_DATE_WINDOW_DAYS, self.date_window_days
            ));
        }
        let total_grades = self
            .avg_grades
            .checked_add(self.grade_jitter)
            .and_then(|per_student| per_student.checked_mul(self.students));
        match total_grades {
            Some(total) if total <= MAX_SEED_GRADES => {}
            _ => {
                return Err(format!(
                    "{} students with up to {} + {} grades each exceeds {} grades",
                    self.students, self.avg_grades, self.grade_jitter, MAX_SEED_GRADES
                ));
            }
        }
        if let Some(duplicate) = first_duplicate(&self.groups) {
            return Err(format!("duplicate group name: {}", duplicate));
        }
        Ok(())
    }

    /// Smallest per-student grade count
    pub fn min_grades_per_student(&self) -> usize {
        self.avg_grades.saturating_sub(self.grade_jitter)
    }

    /// Largest per-student grade count
    pub fn max_grades_per_student(&self) -> usize {
        self.avg_grades.saturating_add(self.grade_jitter)
    }

    /// Oldest date a grade can carry, if representable
    pub fn earliest_grade_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        TimeDelta::try_days(self.date_window_days).and_then(|window| today.checked_sub_signed(window))
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(*name))
        .map(|(_, name)| name.as_str())
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Equivalent `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_teachers() -> usize {
    5
}

fn default_students() -> usize {
    50
}

fn default_avg_grades() -> usize {
    20
}

fn default_grade_jitter() -> usize {
    3
}

fn default_min_grade() -> i64 {
    1
}

fn default_max_grade() -> i64 {
    12
}

fn default_date_window_days() -> i64 {
    365
}

fn default_subjects() -> Vec<String> {
    [
        "математика",
        "література",
        "англійська",
        "історія",
        "географія",
        "біологія",
        "хімія",
        "фізика",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_groups() -> Vec<String> {
    ["БЛБ-31", "БЛБ-32", "БЛБ-33"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load the configuration file, creating it with defaults if missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            log::warn!("Config file not found at {:?}, creating default config.", path);
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.database_path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("Database path must not be empty"));
            }
        }

        self.seed
            .validate()
            .map_err(|e| anyhow!("Invalid seed configuration: {}", e))?;

        Ok(())
    }

    /// Resolve the database location
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => crate::database::DatabaseConnection::default_database_path(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            seed: SeedConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
