use std::sync::Arc;
use std::time::Duration;

use finguard_application::AuditSink;
use finguard_core::AppError;
use finguard_infrastructure::{HttpAuditSink, PostgresAuditSink, TracingAuditSink};
use tracing::info;

use crate::api_config::AuditSinkConfig;

use super::database::connect_and_migrate;

pub async fn build_audit_sink(config: &AuditSinkConfig) -> Result<Arc<dyn AuditSink>, AppError> {
    match config {
        AuditSinkConfig::Console => {
            info!(sink = "console", "security audit sink configured");
            Ok(Arc::new(TracingAuditSink::new()))
        }
        AuditSinkConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!(sink = "postgres", "security audit sink configured");
            Ok(Arc::new(PostgresAuditSink::new(pool)))
        }
        AuditSinkConfig::Http(http_config) => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build audit http client: {error}"))
                })?;
            info!(
                sink = "http",
                endpoint = %http_config.endpoint,
                "security audit sink configured"
            );
            Ok(Arc::new(HttpAuditSink::new(http_client, http_config.clone())))
        }
    }
}
