//! Workforce API server entry point.

use workforce_api::build_router;
use workforce_api::config::AppConfig;
use workforce_api::error::AppError;
use workforce_api::state::AppState;
use workforce_api::telemetry;
use workforce_store::PgDatabase;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting workforce API server");

    let db = PgDatabase::connect(&config.database_url, config.max_connections).await?;
    if config.run_migrations {
        db.migrate().await?;
        tracing::info!("Database migrations applied");
    }

    let app = build_router(AppState::new(db));

    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    telemetry.shutdown();
    Ok(())
}
