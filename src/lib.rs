/*!
 * # gradebook
 *
 * A small academic-records store backed by SQLite, with a synthetic data
 * generator and a fixed catalog of analytical queries.
 *
 * ## Features
 *
 * - Five-table schema: teachers, groups, subjects, students, grades
 * - Reproducible synthetic seeding staged as one atomic batch
 * - Twelve read-only queries built as structured descriptions and
 *   rendered to parameterized SQL
 * - Optional strict id checking for query parameters
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: Connection, schema, records and batched inserts
 * - `seed`: Synthetic data generation:
 *   - `seed::generator`: RNG-driven row generators
 *   - `seed::seeder`: Atomic staging of a generated dataset
 * - `query`: The query catalog:
 *   - `query::plan`: Structured query descriptions and SQL rendering
 *   - `query::catalog`: Typed execution of the twelve queries
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod query;
pub mod seed;

// Re-export main types for easier usage
pub use app_config::{Config, SeedConfig};
pub use app_controller::Controller;
pub use database::DatabaseConnection;
pub use errors::{AppError, QueryError, SeedError};
pub use query::{Catalog, QueryId, QueryOutput};
pub use seed::{seed_database, SeedOptions, SeedReport};
