//! Audit sink that writes security events to tracing output.

use async_trait::async_trait;
use finguard_application::AuditSink;
use finguard_core::AppResult;
use finguard_domain::{SecurityEvent, Severity};
use tracing::{info, warn};

/// Development audit sink that logs events to the console.
#[derive(Clone)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates a new tracing audit sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record_event(&self, event: &SecurityEvent) -> AppResult<()> {
        let details = serde_json::Value::Object(event.details.clone());

        if event.severity >= Severity::High {
            warn!(
                target: "finguard::audit",
                user_id = %event.user_id,
                action = event.event_type.as_str(),
                severity = event.severity.as_str(),
                context = event.context.as_deref().unwrap_or_default(),
                blocked = event.blocked,
                details = %details,
                occurred_at = %event.occurred_at,
                "security event"
            );
        } else {
            info!(
                target: "finguard::audit",
                user_id = %event.user_id,
                action = event.event_type.as_str(),
                severity = event.severity.as_str(),
                context = event.context.as_deref().unwrap_or_default(),
                blocked = event.blocked,
                details = %details,
                occurred_at = %event.occurred_at,
                "security event"
            );
        }

        Ok(())
    }
}
