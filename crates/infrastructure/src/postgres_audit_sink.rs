use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use finguard_application::AuditSink;
use finguard_core::{AppError, AppResult};
use finguard_domain::SecurityEvent;

/// PostgreSQL-backed audit sink writing to `security_logs`.
#[derive(Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Creates a sink with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn record_event(&self, event: &SecurityEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO security_logs (
                user_id,
                action,
                severity,
                context,
                blocked,
                details,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.user_id.as_str())
        .bind(event.event_type.as_str())
        .bind(event.severity.as_str())
        .bind(event.context.as_deref())
        .bind(event.blocked)
        .bind(Json(&event.details))
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append security event: {error}")))?;

        Ok(())
    }
}
