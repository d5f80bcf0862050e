use actix_web::{web, App, HttpServer};
use backend::config::server::ServerConfig;
use backend::infra::state::build_state;
use backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_env(config.runtime_env)
        .with_db(config.db_kind)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        env = ?config.runtime_env,
        db_kind = ?config.db_kind,
        "Starting courses backend"
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
