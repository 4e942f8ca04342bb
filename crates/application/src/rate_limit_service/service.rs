use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use finguard_domain::{OperationKind, SecurityEvent, SecurityEventType, Severity, mask_identifier};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::security_event_service::SecurityEventPublisher;

use super::config::RateLimitConfig;

/// Attempt counter for one `(operation, identifier)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Attempts admitted in the current window.
    pub count: u32,
    /// Absolute end of the current window.
    pub reset_time: DateTime<Utc>,
}

impl RateLimitRecord {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.reset_time
    }
}

/// Application service for in-memory admission rate limiting.
#[derive(Clone)]
pub struct RateLimitService {
    records: Arc<Mutex<HashMap<RecordKey, RateLimitRecord>>>,
    config: Arc<RateLimitConfig>,
    clock: Arc<dyn Clock>,
    events: SecurityEventPublisher,
}

impl RateLimitService {
    /// Creates a rate limiter with its own empty store.
    #[must_use]
    pub fn new(
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
        events: SecurityEventPublisher,
    ) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
            clock,
            events,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Records an attempt and reports whether it is admitted.
    ///
    /// `custom_limit` replaces the operation ceiling for this call only. The
    /// first attempt of a fresh or expired window is always admitted.
    pub fn check_limit(
        &self,
        identifier: &str,
        operation: &OperationKind,
        custom_limit: Option<u32>,
    ) -> bool {
        let limit = custom_limit.unwrap_or_else(|| self.config.limit_for(operation));
        let now = self.clock.now();
        let key = record_key(operation, identifier);

        let rejected_at = {
            let mut records = self.lock_records();
            match records.get_mut(&key) {
                Some(record) if !record.is_expired(now) => {
                    if record.count >= limit {
                        Some(record.reset_time)
                    } else {
                        record.count = record.count.saturating_add(1);
                        None
                    }
                }
                _ => {
                    records.insert(
                        key,
                        RateLimitRecord {
                            count: 1,
                            reset_time: now
                                .checked_add_signed(self.config.window())
                                .unwrap_or(DateTime::<Utc>::MAX_UTC),
                        },
                    );
                    None
                }
            }
        };

        let Some(reset_time) = rejected_at else {
            return true;
        };

        let masked = mask_identifier(identifier);
        warn!(
            identifier = %masked,
            operation = operation.as_str(),
            limit,
            "rate limit exceeded"
        );
        self.events.publish(
            SecurityEvent::new(
                identifier,
                SecurityEventType::RateLimitExceeded,
                Severity::Medium,
                now,
            )
            .with_context(operation.as_str())
            .with_detail("limit", limit)
            .with_detail("retry_after_ms", (reset_time - now).num_milliseconds().max(0)),
        );

        false
    }

    /// Forgets the counter for a key, e.g. after a successful password change.
    pub fn clear_attempts(&self, identifier: &str, operation: &OperationKind) {
        self.lock_records().remove(&record_key(operation, identifier));
    }

    /// Returns the live attempt count, or `None` when no window is open.
    #[must_use]
    pub fn attempt_count(&self, identifier: &str, operation: &OperationKind) -> Option<u32> {
        let now = self.clock.now();
        self.lock_records()
            .get(&record_key(operation, identifier))
            .filter(|record| !record.is_expired(now))
            .map(|record| record.count)
    }

    /// Returns the stored record for a key, expired or not.
    #[must_use]
    pub fn record(&self, identifier: &str, operation: &OperationKind) -> Option<RateLimitRecord> {
        self.lock_records()
            .get(&record_key(operation, identifier))
            .copied()
    }

    /// Deletes every record whose window has ended. Returns how many went.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.lock_records();
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        let removed = before - records.len();

        debug!(removed, remaining = records.len(), "rate limit sweep finished");
        removed
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.lock_records().len()
    }

    /// Runs [`Self::sweep_expired`] on the configured interval, forever.
    pub async fn run_periodic_sweep(self) {
        let mut interval = tokio::time::interval(self.config.sweep_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            self.sweep_expired();
        }
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<RecordKey, RateLimitRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Operation and caller identifier, kept apart so no name can collide.
type RecordKey = (OperationKind, String);

fn record_key(operation: &OperationKind, identifier: &str) -> RecordKey {
    (operation.clone(), identifier.to_owned())
}
