//! Shared database configuration and migration infrastructure.
//! Used by the backend and the migration CLI.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use error::DbInfraError;
pub use infra::db::core::{connect_pool, orchestrate_migration, run_migration, sanitize_db_url};
