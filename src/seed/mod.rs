/*!
 * Synthetic data generation for the academic records store.
 *
 * - `names`: pools used to synthesise full names
 * - `generator`: pure, RNG-driven row generators
 * - `seeder`: stages a generated dataset into one transaction
 */

pub mod names;
pub mod generator;
pub mod seeder;

pub use generator::SeedDataset;
pub use seeder::{seed_database, seed_with_rng, SeedOptions, SeedReport};
