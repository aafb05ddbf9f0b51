use actix_web::{web, App, HttpServer};
use alliance_backend::config::GameConfig;
use alliance_backend::infra::state::build_state;
use alliance_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use alliance_backend::routes;
use alliance_backend::services::spawn_round_timer;
use alliance_backend::telemetry;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_config(config.clone()).build() {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let timer = spawn_round_timer(app_state.coordinator.clone(), shutdown.clone());

    info!(host = %config.host, port = config.port, "Starting Alliance game server");

    let data = web::Data::new(app_state);
    let served = HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    shutdown.cancel();
    if let Err(e) = timer.await {
        error!(error = %e, "Round timer task ended abnormally");
    }
    info!("Server stopped");
    served
}
