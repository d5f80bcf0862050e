use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Runtime environment the process is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

impl FromStr for RuntimeEnv {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prod" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            other => Err(DbInfraError::config(format!(
                "Unknown runtime env '{other}' (expected prod | test)"
            ))),
        }
    }
}

/// Database engine and storage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "sqlite-file" => Ok(Self::SqliteFile),
            "sqlite-memory" => Ok(Self::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "Unknown db kind '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => sea_orm::DatabaseBackend::Postgres,
            DbKind::SqliteFile | DbKind::SqliteMemory => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Reject combinations that cannot work.
///
/// An in-memory SQLite database disappears with its pool, so it is only
/// accepted for tests.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    if env == RuntimeEnv::Prod && db_kind == DbKind::SqliteMemory {
        return Err(DbInfraError::config(
            "sqlite-memory is only supported in the test environment",
        ));
    }
    Ok(())
}

/// Build the connection string for the given environment, engine and owner.
pub fn make_conn_spec(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<String, DbInfraError> {
    validate_db_config(env, db_kind)?;

    match db_kind {
        DbKind::Postgres => postgres_url(env, owner),
        DbKind::SqliteFile => {
            let path = sqlite_file_path(env);
            Ok(format!("sqlite://{}?mode=rwc", path.display()))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Location of the SQLite file for the given environment.
pub fn sqlite_file_path(env: RuntimeEnv) -> PathBuf {
    let dir = env::var("SQLITE_DB_DIR").unwrap_or_else(|_| "./data".to_string());
    let file = match env {
        RuntimeEnv::Prod => "courses.db",
        RuntimeEnv::Test => "courses_test.db",
    };
    PathBuf::from(dir).join(file)
}

fn postgres_url(env: RuntimeEnv, owner: DbOwner) -> Result<String, DbInfraError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = db_name(env)?;
    let (username, password) = credentials(owner)?;

    let username = utf8_percent_encode(&username, NON_ALPHANUMERIC);
    let password = utf8_percent_encode(&password, NON_ALPHANUMERIC);

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn db_name(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            // Test DB must end with "_test"
            if !db_name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test env requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), DbInfraError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((
            must_var("COURSES_OWNER_USER")?,
            must_var("COURSES_OWNER_PASSWORD")?,
        )),
    }
}

fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("Required environment variable '{name}' is not set"))
    })
}
