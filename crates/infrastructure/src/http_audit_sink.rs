//! Audit sink posting events to a managed backend's REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use finguard_application::AuditSink;
use finguard_core::{AppError, AppResult};
use finguard_domain::SecurityEvent;
use serde_json::json;

/// Connection settings for [`HttpAuditSink`].
#[derive(Debug, Clone)]
pub struct HttpAuditSinkConfig {
    /// Table insert endpoint, e.g. `https://<project>/rest/v1/security_logs`.
    pub endpoint: String,
    /// API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Attempts per event, at least one.
    pub max_attempts: u8,
    /// Linear backoff step between attempts.
    pub retry_backoff_ms: u64,
}

/// HTTP implementation of the audit sink port.
pub struct HttpAuditSink {
    http_client: reqwest::Client,
    config: HttpAuditSinkConfig,
}

impl HttpAuditSink {
    /// Creates a sink over an existing HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, mut config: HttpAuditSinkConfig) -> Self {
        config.max_attempts = config.max_attempts.max(1);
        config.retry_backoff_ms = config.retry_backoff_ms.max(50);

        Self {
            http_client,
            config,
        }
    }

    fn payload(event: &SecurityEvent) -> serde_json::Value {
        json!({
            "user_id": event.user_id,
            "action": event.event_type.as_str(),
            "severity": event.severity.as_str(),
            "context": event.context,
            "blocked": event.blocked,
            "details": event.details,
            "timestamp": event.occurred_at.to_rfc3339(),
        })
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn record_event(&self, event: &SecurityEvent) -> AppResult<()> {
        let payload = Self::payload(event);
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.config.max_attempts {
            attempt = attempt.saturating_add(1);
            let response = self
                .http_client
                .post(self.config.endpoint.as_str())
                .header("apikey", self.config.api_key.as_str())
                .bearer_auth(self.config.api_key.as_str())
                .header("Prefer", "return=minimal")
                .json(&payload)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from audit endpoint",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Internal(format!(
                        "audit endpoint rejected security event with status {status}: {body}"
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("audit endpoint transport error: {error}"));
                }
            }

            if attempt < self.config.max_attempts {
                let delay = self.config.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Internal(last_error.unwrap_or_else(|| {
            "audit endpoint delivery failed".to_owned()
        })))
    }
}
