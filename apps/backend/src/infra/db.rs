use db_infra::config::db::{DbKind, DbOwner, RuntimeEnv};
use db_infra::{connect_pool, run_migration};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;

/// Connect the application pool and bring the schema up to date.
///
/// SQLite is migrated through the application pool itself (an in-memory
/// database exists only inside that pool). Postgres is migrated through a
/// separate owner-credential pool that is closed afterwards.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_pool(env, db_kind, DbOwner::App).await?;

    match db_kind {
        DbKind::Postgres => {
            let admin = db_infra::infra::db::build_admin_pool(env, db_kind).await?;
            run_migration(&admin, env, db_kind, MigrationCommand::Up).await?;
            admin.close().await?;
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            run_migration(&conn, env, db_kind, MigrationCommand::Up).await?;
        }
    }

    info!(env = ?env, db_kind = ?db_kind, "db=ready");
    Ok(conn)
}
