use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{make_conn_spec, validate_db_config, DbKind, DbOwner, RuntimeEnv};
use crate::error::DbInfraError;

fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt, interval_ms
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt, max_attempts, interval_ms
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::Connect {
        message: "no error recorded after max attempts".to_string(),
    }))
}

fn connect_options(url: &str, db_kind: DbKind, owner: DbOwner) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url.to_string());
    match (db_kind, owner) {
        // Every pooled connection to `sqlite::memory:` is its own database.
        (DbKind::SqliteMemory, _) | (_, DbOwner::Owner) => {
            opt.min_connections(1).max_connections(1);
        }
        (DbKind::SqliteFile, DbOwner::App) => {
            opt.min_connections(1).max_connections(4);
        }
        (DbKind::Postgres, DbOwner::App) => {
            let max = (num_cpus::get() as u32 * 2).clamp(4, 32);
            opt.min_connections(1).max_connections(max);
        }
    }
    opt.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    opt
}

/// Open a connection pool for the given environment, engine and owner.
///
/// Postgres connections are retried a few times so the service can start
/// alongside its database container.
pub async fn connect_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, owner)?;
    let opt = connect_options(&url, db_kind, owner);

    info!(
        env = ?env,
        db_kind = ?db_kind,
        engine = get_db_engine(db_kind),
        url = %sanitize_db_url(&url),
        "db=connect"
    );

    if db_kind == DbKind::SqliteFile {
        let path = crate::config::db::sqlite_file_path(env);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                DbInfraError::config(format!(
                    "failed to create sqlite directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
    }

    if db_kind == DbKind::Postgres {
        retry_connection(
            || {
                let opt = opt.clone();
                async move {
                    Database::connect(opt)
                        .await
                        .map_err(|e| DbInfraError::Connect {
                            message: format!("failed to connect to Postgres: {e}"),
                        })
                }
            },
            5,
            500,
        )
        .await
    } else {
        Database::connect(opt)
            .await
            .map_err(|e| DbInfraError::Connect {
                message: format!("failed to connect to database: {e}"),
            })
    }
}

/// Single-connection pool with owner credentials, used for schema changes.
pub async fn build_admin_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    connect_pool(env, db_kind, DbOwner::Owner).await
}

/// Mask the password in a connection string for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let Some((auth_part, host_part)) = url[scheme_end..].rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.split_once(':') {
        Some((user, _password)) => format!("{}{user}:***@{host_part}", &url[..scheme_end]),
        None => url.to_string(),
    }
}

/// Connect with owner credentials and run `command`.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(env, db_kind)?;
    let pool = build_admin_pool(env, db_kind).await?;
    run_migration(&pool, env, db_kind, command).await
}

/// Run `command` on an open connection and verify the applied count afterwards.
pub async fn run_migration(
    pool: &DatabaseConnection,
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let start = Instant::now();
    info!(
        "migrate=start env={:?} db_kind={:?} engine={}",
        env,
        db_kind,
        get_db_engine(db_kind)
    );

    migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("migration execution failed: {e}"),
        })?;

    if command == MigrationCommand::Status {
        info!("migrate=done");
        return Ok(());
    }

    let expected_count = Migrator::migrations().len();
    let applied_count = migration::count_applied_migrations(pool)
        .await
        .unwrap_or(0);
    info!(
        migrate = "counts",
        expected_count = expected_count,
        applied_count = applied_count,
        elapsed_ms = start.elapsed().as_millis() as u64
    );

    match command {
        MigrationCommand::Reset if applied_count != 0 => Err(DbInfraError::Migration {
            message: format!(
                "reset should leave 0 migrations applied, but {applied_count} were found (env={env:?}, db_kind={db_kind:?})"
            ),
        }),
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
            if applied_count != expected_count =>
        {
            Err(DbInfraError::Migration {
                message: format!(
                    "expected {expected_count} migrations, but {applied_count} were applied (env={env:?}, db_kind={db_kind:?})"
                ),
            })
        }
        _ => {
            info!("migrate=done");
            Ok(())
        }
    }
}
