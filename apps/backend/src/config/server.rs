//! Server configuration loaded from environment variables.

use std::env;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,
    pub db_kind: DbKind,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through `lookup`, which returns `None` for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("COURSES_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("COURSES_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("COURSES_PORT must be a valid port number, got '{raw}'"))
            })?,
        };

        let runtime_env = match lookup("COURSES_ENV") {
            None => RuntimeEnv::Prod,
            Some(raw) => raw.parse::<RuntimeEnv>()?,
        };

        let db_kind = match lookup("COURSES_DB") {
            None => DbKind::Postgres,
            Some(raw) => raw.parse::<DbKind>()?,
        };

        Ok(Self {
            host,
            port,
            runtime_env,
            db_kind,
        })
    }
}
