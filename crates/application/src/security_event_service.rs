//! Fire-and-forget security event delivery.
//!
//! Admission checks publish events synchronously into an unbounded channel;
//! a dispatcher task drains it into the configured [`AuditSink`]. Sink
//! failures are logged and dropped so they never reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use finguard_core::AppResult;
use finguard_domain::SecurityEvent;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

/// Durable destination for security events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Stores one security event.
    async fn record_event(&self, event: &SecurityEvent) -> AppResult<()>;
}

/// Receiving half of the security event channel.
pub type SecurityEventReceiver = UnboundedReceiver<SecurityEvent>;

/// Creates a connected publisher and receiver pair.
#[must_use]
pub fn security_event_channel() -> (SecurityEventPublisher, SecurityEventReceiver) {
    let (sender, receiver) = unbounded_channel();
    (
        SecurityEventPublisher {
            sender: Some(sender),
        },
        receiver,
    )
}

/// Non-blocking handle used by admission checks to emit events.
#[derive(Debug, Clone)]
pub struct SecurityEventPublisher {
    sender: Option<UnboundedSender<SecurityEvent>>,
}

impl SecurityEventPublisher {
    /// Creates a publisher that discards every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queues an event for delivery without waiting on the sink.
    pub fn publish(&self, event: SecurityEvent) {
        let Some(sender) = &self.sender else {
            return;
        };

        if let Err(error) = sender.send(event) {
            warn!(
                event_type = error.0.event_type.as_str(),
                "security event dispatcher is not running, event dropped"
            );
        }
    }
}

/// Drains queued events into an audit sink.
pub struct SecurityEventDispatcher {
    receiver: SecurityEventReceiver,
    sink: Arc<dyn AuditSink>,
}

impl SecurityEventDispatcher {
    /// Creates a dispatcher over a receiver and sink.
    #[must_use]
    pub fn new(receiver: SecurityEventReceiver, sink: Arc<dyn AuditSink>) -> Self {
        Self { receiver, sink }
    }

    /// Forwards events until every publisher has been dropped.
    ///
    /// Returns the number of events the sink accepted.
    pub async fn run(mut self) -> u64 {
        let mut delivered = 0_u64;

        while let Some(event) = self.receiver.recv().await {
            match self.sink.record_event(&event).await {
                Ok(()) => {
                    delivered = delivered.saturating_add(1);
                    debug!(event_type = event.event_type.as_str(), "security event delivered");
                }
                Err(error) => {
                    warn!(
                        event_type = event.event_type.as_str(),
                        severity = event.severity.as_str(),
                        error = %error,
                        "failed to deliver security event to audit sink"
                    );
                }
            }
        }

        delivered
    }
}
