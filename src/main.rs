// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use gradebook::app_config::{Config, LogLevel};
use gradebook::app_controller::Controller;
use gradebook::{QueryId, SeedOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Populate the database with one synthetic seed batch
    Seed {
        /// Delete existing rows in the same transaction before seeding
        #[arg(long)]
        reset: bool,

        /// RNG seed for a reproducible dataset
        #[arg(long = "seed", value_name = "N")]
        rng_seed: Option<u64>,
    },

    /// Run one catalog query by number
    Query {
        /// Query number
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        number: u8,

        /// Id arguments in the order the query expects
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<i64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Fail on ids that do not exist instead of returning no rows
        #[arg(long)]
        strict: bool,

        /// Print the rendered SQL and parameters instead of running
        #[arg(long)]
        explain: bool,
    },

    /// Run every query once with sample arguments
    Report,

    /// Show row counts per table and the database size
    Stats,

    /// Generate shell completions for gradebook
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// gradebook - academic records store with a synthetic seeder and query catalog
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version)]
#[command(about = "Academic records store with a seed generator and query catalog")]
#[command(long_about = "gradebook keeps teachers, groups, subjects, students and grades in SQLite,
fills them with synthetic data and answers a fixed catalog of twelve questions.

EXAMPLES:
    gradebook seed                       # Seed an empty database
    gradebook seed --reset --seed 42     # Replace all rows with a reproducible dataset
    gradebook query 1                    # Top five students
    gradebook query 7 1 3 --json         # Grades of group 1 in subject 3 as JSON
    gradebook query 12 2 1 --explain     # Show the SQL for the last lesson query
    gradebook report                     # Run every query with sample arguments
    gradebook completions bash > gradebook.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Database file, overriding the configured location
    #[arg(short, long, global = true, env = "GRADEBOOK_DATABASE")]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Install the logger at trace and narrow it once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "gradebook", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    if let Commands::Query { number, args, explain: true, .. } = &cli.command {
        let id = query_id(*number)?;
        let rendered = gradebook::Catalog::explain(id, args)?;
        println!("{}", rendered);
        return Ok(());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Seed { reset, rng_seed } => {
            let options = SeedOptions {
                reset,
                rng_seed,
                ..SeedOptions::default()
            };
            let report = controller.seed(&options)?;
            if report.deleted > 0 {
                info!("Removed {} existing rows", report.deleted);
            }
            println!("Seeded {}", report);
        }
        Commands::Query { number, args, json, strict, .. } => {
            let id = query_id(number)?;
            let output = controller.run_query(id, &args, strict)?;
            if json {
                let text = serde_json::to_string_pretty(&output)
                    .context("Failed to serialize query result")?;
                println!("{}", text);
            } else {
                println!("{}", id.description());
                println!("{}", output);
            }
        }
        Commands::Report => {
            let sections = controller.report()?;
            println!("{}", Controller::format_report(&sections));
        }
        Commands::Stats => {
            let stats = controller.stats()?;
            println!("Database: {:?}", controller.database().path());
            println!("{}", stats);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn query_id(number: u8) -> Result<QueryId> {
    QueryId::from_number(number).ok_or_else(|| anyhow::anyhow!("Unknown query number: {}", number))
}
