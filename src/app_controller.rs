use log::{debug, info};

use crate::app_config::Config;
use crate::database::{DatabaseConnection, DatabaseStats};
use crate::errors::AppError;
use crate::query::{Catalog, QueryId, QueryOutput};
use crate::seed::{self, SeedOptions, SeedReport};

/// Separator printed between report sections
pub const REPORT_RULE: &str = "--------------------------------------------------";

/// Main application controller for the records store
pub struct Controller {
    config: Config,
    db: DatabaseConnection,
}

/// One query of the demonstration report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub id: QueryId,
    pub args: Vec<i64>,
    pub output: QueryOutput,
}

impl Controller {
    /// Create a new controller for test purposes over an in-memory database
    pub fn new_for_test() -> Result<Self, AppError> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::with_database(Config::default(), db))
    }

    /// Open the configured database
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let path = config.resolved_database_path()?;
        let db = DatabaseConnection::new(&path)?;
        Ok(Self::with_database(config, db))
    }

    /// Use an already opened connection
    pub fn with_database(config: Config, db: DatabaseConnection) -> Self {
        Self { config, db }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Run one seed batch with the configured generator settings
    pub fn seed(&self, options: &SeedOptions) -> Result<SeedReport, AppError> {
        let report = seed::seed_database(&self.db, &self.config.seed, options)?;
        Ok(report)
    }

    /// Run a single catalog query
    pub fn run_query(&self, id: QueryId, args: &[i64], strict: bool) -> Result<QueryOutput, AppError> {
        debug!("Running {} with args {:?} (strict: {})", id, args, strict);
        let catalog = Catalog::new(self.db.clone()).with_strict_ids(strict);
        Ok(catalog.run(id, args)?)
    }

    /// Run every query once with its sample arguments
    pub fn report(&self) -> Result<Vec<ReportSection>, AppError> {
        let catalog = Catalog::new(self.db.clone());
        let mut sections = Vec::with_capacity(QueryId::ALL.len());

        for id in QueryId::ALL {
            let args = id.sample_args().to_vec();
            let output = catalog.run(id, &args)?;
            sections.push(ReportSection { id, args, output });
        }

        info!("Report covered {} queries", sections.len());
        Ok(sections)
    }

    /// Render report sections as description and result, separated by a rule
    pub fn format_report(sections: &[ReportSection]) -> String {
        sections
            .iter()
            .map(|section| format!("{}\n{}", section.id.description(), section.output))
            .collect::<Vec<_>>()
            .join(&format!("\n{}\n", REPORT_RULE))
    }

    /// Row counts and file size
    pub fn stats(&self) -> Result<DatabaseStats, AppError> {
        Ok(self.db.stats()?)
    }
}
