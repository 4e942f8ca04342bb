use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use finguard_core::AppResult;
use finguard_domain::{
    SecurityEvent, SecurityEventType, Severity, THREAT_SIGNATURES, ThreatSignature,
    mask_identifier,
};
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::security_event_service::SecurityEventPublisher;

use super::config::SuspiciousActivityConfig;
use super::metrics::{SecurityMetrics, ThreatCount};
use super::signatures::SignatureMatcher;

/// Placeholder stored instead of the offending input.
const REDACTED_INPUT: &str = "[REDACTED]";

/// Per-user accumulator of suspicious hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspicionRecord {
    /// Total suspicious hits.
    pub count: u32,
    /// Timestamp of the most recent hit.
    pub last_attempt: DateTime<Utc>,
    /// Sticky block flag.
    pub blocked: bool,
    hits_in_window: VecDeque<DateTime<Utc>>,
    signature_hits: BTreeMap<&'static str, u32>,
}

impl SuspicionRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            last_attempt: now,
            blocked: false,
            hits_in_window: VecDeque::new(),
            signature_hits: BTreeMap::new(),
        }
    }

    fn register_hit(&mut self, signature: &'static str, now: DateTime<Utc>, window: Duration) {
        self.count = self.count.saturating_add(1);
        self.last_attempt = now;
        *self.signature_hits.entry(signature).or_insert(0) += 1;

        self.hits_in_window.push_back(now);
        while self
            .hits_in_window
            .front()
            .is_some_and(|first| now - *first > window)
        {
            self.hits_in_window.pop_front();
        }
    }

    /// Hits that fall inside the trailing block window as of the last hit.
    #[must_use]
    pub fn hits_in_window(&self) -> usize {
        self.hits_in_window.len()
    }
}

/// Application service screening free text for attack signatures.
#[derive(Clone)]
pub struct SuspiciousActivityService {
    records: Arc<Mutex<HashMap<String, SuspicionRecord>>>,
    matcher: Arc<SignatureMatcher>,
    config: Arc<SuspiciousActivityConfig>,
    clock: Arc<dyn Clock>,
    events: SecurityEventPublisher,
}

impl SuspiciousActivityService {
    /// Creates a detector over the built-in signature table.
    pub fn new(
        config: SuspiciousActivityConfig,
        clock: Arc<dyn Clock>,
        events: SecurityEventPublisher,
    ) -> AppResult<Self> {
        Self::with_signatures(THREAT_SIGNATURES, config, clock, events)
    }

    /// Creates a detector over a caller-supplied signature table.
    pub fn with_signatures(
        signatures: &[ThreatSignature],
        config: SuspiciousActivityConfig,
        clock: Arc<dyn Clock>,
        events: SecurityEventPublisher,
    ) -> AppResult<Self> {
        config.validate()?;

        Ok(Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            matcher: Arc::new(SignatureMatcher::compile(signatures)?),
            config: Arc::new(config),
            clock,
            events,
        })
    }

    /// Returns the first signature the input matches, without side effects.
    #[must_use]
    pub fn scan(&self, input: &str) -> Option<ThreatSignature> {
        self.matcher.first_match(input).copied()
    }

    /// Screens input for a user and records a hit on match.
    ///
    /// Returns `true` when the input matched. Detection keeps working for
    /// users that are already blocked.
    pub fn detect_bypass_attempt(&self, input: &str, user_id: &str, context: &str) -> bool {
        let Some(signature) = self.scan(input) else {
            return false;
        };

        let now = self.clock.now();
        let (count, hits_in_window, blocked, newly_blocked) = {
            let mut records = self.lock_records();
            let record = records
                .entry(user_id.to_owned())
                .or_insert_with(|| SuspicionRecord::new(now));
            record.register_hit(signature.name, now, self.config.block_window);

            let threshold = usize::try_from(self.config.block_threshold).unwrap_or(usize::MAX);
            let newly_blocked = !record.blocked && record.hits_in_window() >= threshold;
            if newly_blocked {
                record.blocked = true;
            }

            (
                record.count,
                record.hits_in_window(),
                record.blocked,
                newly_blocked,
            )
        };

        let masked = mask_identifier(user_id);
        warn!(
            user_id = %masked,
            context,
            signature = signature.name,
            attempt_count = count,
            "suspicious input detected"
        );
        self.events.publish(
            SecurityEvent::new(
                user_id,
                SecurityEventType::SuspiciousActivity,
                Severity::High,
                now,
            )
            .with_context(context)
            .with_blocked(blocked)
            .with_detail("signature", signature.name)
            .with_detail("input", REDACTED_INPUT)
            .with_detail("attempt_count", count),
        );

        if newly_blocked {
            error!(
                user_id = %masked,
                context,
                hits_in_window,
                "user blocked after multiple bypass attempts"
            );
            self.events.publish(
                SecurityEvent::new(
                    user_id,
                    SecurityEventType::BypassAttempt,
                    Severity::Critical,
                    now,
                )
                .with_context(context)
                .with_blocked(true)
                .with_detail("reason", "multiple bypass attempts")
                .with_detail("hits_in_window", hits_in_window)
                .with_detail("window_seconds", self.config.block_window.num_seconds()),
            );
        }

        true
    }

    /// Returns whether the user is blocked. Unknown users are not.
    #[must_use]
    pub fn is_user_blocked(&self, user_id: &str) -> bool {
        self.lock_records()
            .get(user_id)
            .is_some_and(|record| record.blocked)
    }

    /// Returns a copy of the user's suspicion record.
    #[must_use]
    pub fn suspicion_record(&self, user_id: &str) -> Option<SuspicionRecord> {
        self.lock_records().get(user_id).cloned()
    }

    /// Aggregates metrics over all users, or one user when given.
    #[must_use]
    pub fn security_metrics(&self, user_id: Option<&str>) -> SecurityMetrics {
        let now = self.clock.now();
        let records = self.lock_records();
        let selected: Vec<&SuspicionRecord> = match user_id {
            Some(user_id) => records.get(user_id).into_iter().collect(),
            None => records.values().collect(),
        };

        let mut threat_totals: BTreeMap<&'static str, u64> = BTreeMap::new();
        for record in &selected {
            for (signature, hits) in &record.signature_hits {
                *threat_totals.entry(*signature).or_insert(0) += u64::from(*hits);
            }
        }

        let mut top_threats: Vec<ThreatCount> = threat_totals
            .into_iter()
            .map(|(signature, count)| ThreatCount {
                signature: signature.to_owned(),
                count,
            })
            .collect();
        // Stable sort keeps name order among equal counts.
        top_threats.sort_by(|left, right| right.count.cmp(&left.count));
        top_threats.truncate(self.config.top_threats_limit);

        SecurityMetrics {
            total_suspicious_activities: selected
                .iter()
                .map(|record| u64::from(record.count))
                .sum(),
            blocked_users: selected.iter().filter(|record| record.blocked).count(),
            recent_attempts: selected
                .iter()
                .filter(|record| now - record.last_attempt <= self.config.recent_window)
                .count(),
            top_threats,
        }
    }

    /// Administrative reset: drops the user's record, clearing any block.
    ///
    /// Returns `false` when the user had no record.
    pub fn reset_user(&self, user_id: &str, actor: &str) -> bool {
        let removed = self.lock_records().remove(user_id);
        let Some(record) = removed else {
            return false;
        };

        let now = self.clock.now();
        info!(
            user_id = %mask_identifier(user_id),
            actor = %mask_identifier(actor),
            was_blocked = record.blocked,
            "suspicion record reset"
        );
        self.events.publish(
            SecurityEvent::new(user_id, SecurityEventType::ConfigChange, Severity::Low, now)
                .with_context("suspicion_reset")
                .with_detail("actor", mask_identifier(actor))
                .with_detail("was_blocked", record.blocked)
                .with_detail("attempt_count", record.count),
        );

        true
    }

    fn lock_records(&self) -> MutexGuard<'_, HashMap<String, SuspicionRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
