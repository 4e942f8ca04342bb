//! Application services and ports.

#![forbid(unsafe_code)]

mod admission_guard;
mod clock;
mod profile_service;
mod rate_limit_service;
mod security_event_service;
mod suspicious_activity_service;
mod transaction_service;

pub use admission_guard::{AdmissionGuard, AdmissionRequest};
pub use clock::{Clock, ManualClock, SystemClock};
pub use profile_service::{
    CredentialRepository, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PasswordHasher, ProfileService,
};
pub use rate_limit_service::{RateLimitConfig, RateLimitRecord, RateLimitService};
pub use security_event_service::{
    AuditSink, SecurityEventDispatcher, SecurityEventPublisher, SecurityEventReceiver,
    security_event_channel,
};
pub use suspicious_activity_service::{
    SecurityMetrics, SuspicionRecord, SuspiciousActivityConfig, SuspiciousActivityService,
    ThreatCount,
};
pub use transaction_service::{CreateTransactionInput, TransactionRepository, TransactionService};
