use clap::{Parser, ValueEnum};
use db_infra::config::db::{DbKind, RuntimeEnv};
use db_infra::orchestrate_migration;
use migration::MigrationCommand;

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Course API database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: String,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    /// Database type. In-memory SQLite is not offered: it would vanish with the process.
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let command = match args.command.parse::<MigrationCommand>() {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    tracing::info!(command = ?command, env = ?env, db_kind = ?db_kind, "migration-cli start");

    if let Err(e) = orchestrate_migration(env, db_kind, command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
