//! Finguard API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use finguard_application::{SecurityEventDispatcher, security_event_channel};
use finguard_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, AuditSinkConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        let AuditSinkConfig::Postgres { database_url } = &config.audit_sink else {
            return Err(AppError::Validation(
                "migrate requires AUDIT_SINK=postgres".to_owned(),
            ));
        };
        api_services::connect_and_migrate(database_url).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let audit_sink = api_services::build_audit_sink(&config.audit_sink).await?;
    let (events, receiver) = security_event_channel();
    tokio::spawn(SecurityEventDispatcher::new(receiver, audit_sink).run());

    let app_state = api_services::build_app_state(&config, events)?;
    tokio::spawn(
        app_state
            .admission_guard
            .rate_limits()
            .clone()
            .run_periodic_sweep(),
    );

    let app = api_router::build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "finguard-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
