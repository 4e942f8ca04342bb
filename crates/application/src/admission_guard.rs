//! Caller contract for mutating operations.
//!
//! Order is fixed: blocked users first, then the rate limit, then every
//! free-text field. The first failing check rejects the whole operation.

use finguard_core::{AppError, AppResult};
use finguard_domain::{OperationKind, mask_identifier};
use tracing::warn;

use crate::rate_limit_service::RateLimitService;
use crate::suspicious_activity_service::SuspiciousActivityService;

/// A pending mutation awaiting admission.
#[derive(Debug, Clone)]
pub struct AdmissionRequest<'a> {
    user_id: &'a str,
    identifier: &'a str,
    operation: OperationKind,
    custom_limit: Option<u32>,
    context: &'a str,
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> AdmissionRequest<'a> {
    /// Creates a request rate limited by user id.
    #[must_use]
    pub fn new(user_id: &'a str, operation: OperationKind, context: &'a str) -> Self {
        Self {
            user_id,
            identifier: user_id,
            operation,
            custom_limit: None,
            context,
            fields: Vec::new(),
        }
    }

    /// Rate limits by a different identifier, such as a client address.
    #[must_use]
    pub fn with_identifier(mut self, identifier: &'a str) -> Self {
        self.identifier = identifier;
        self
    }

    /// Overrides the operation ceiling for this request.
    #[must_use]
    pub fn with_custom_limit(mut self, custom_limit: u32) -> Self {
        self.custom_limit = Some(custom_limit);
        self
    }

    /// Adds a free-text field destined for persistence or rendering.
    #[must_use]
    pub fn with_field(mut self, name: &'a str, value: &'a str) -> Self {
        self.fields.push((name, value));
        self
    }
}

/// Composes the rate limiter and suspicious-activity detector.
#[derive(Clone)]
pub struct AdmissionGuard {
    rate_limits: RateLimitService,
    detector: SuspiciousActivityService,
}

impl AdmissionGuard {
    /// Creates a guard over the two admission components.
    #[must_use]
    pub fn new(rate_limits: RateLimitService, detector: SuspiciousActivityService) -> Self {
        Self {
            rate_limits,
            detector,
        }
    }

    /// Returns the rate limiter.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimitService {
        &self.rate_limits
    }

    /// Returns the suspicious-activity detector.
    #[must_use]
    pub fn detector(&self) -> &SuspiciousActivityService {
        &self.detector
    }

    /// Admits or rejects a pending mutation.
    pub fn admit(&self, request: &AdmissionRequest<'_>) -> AppResult<()> {
        if self.detector.is_user_blocked(request.user_id) {
            warn!(
                user_id = %mask_identifier(request.user_id),
                context = request.context,
                "rejected mutation from blocked user"
            );
            return Err(AppError::UserBlocked(
                "account temporarily suspended, contact support".to_owned(),
            ));
        }

        if !self
            .rate_limits
            .check_limit(request.identifier, &request.operation, request.custom_limit)
        {
            return Err(AppError::RateLimited(
                "too many attempts, please try again in a few minutes".to_owned(),
            ));
        }

        for (field, value) in &request.fields {
            let context = format!("{}.{field}", request.context);
            if self
                .detector
                .detect_bypass_attempt(value, request.user_id, &context)
            {
                return Err(AppError::SuspiciousInput(format!(
                    "field '{field}' contains content that is not allowed"
                )));
            }
        }

        Ok(())
    }

    /// Resets the counter of an operation that succeeded.
    pub fn record_success(&self, identifier: &str, operation: &OperationKind) {
        self.rate_limits.clear_attempts(identifier, operation);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use finguard_core::{AppError, AppResult};
    use finguard_domain::OperationKind;

    use crate::clock::ManualClock;
    use crate::rate_limit_service::{RateLimitConfig, RateLimitService};
    use crate::security_event_service::SecurityEventPublisher;
    use crate::suspicious_activity_service::{SuspiciousActivityConfig, SuspiciousActivityService};

    use super::{AdmissionGuard, AdmissionRequest};

    fn guard() -> AppResult<AdmissionGuard> {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let events = SecurityEventPublisher::disabled();
        Ok(AdmissionGuard::new(
            RateLimitService::new(RateLimitConfig::default(), clock.clone(), events.clone()),
            SuspiciousActivityService::new(SuspiciousActivityConfig::default(), clock, events)?,
        ))
    }

    #[test]
    fn clean_request_is_admitted() -> AppResult<()> {
        let guard = guard()?;
        let request = AdmissionRequest::new(
            "user-1",
            OperationKind::FormSubmission,
            "create_transaction",
        )
        .with_field("description", "Grocery shopping at SuperMart")
        .with_field("category", "groceries");

        guard.admit(&request)
    }

    #[test]
    fn suspicious_field_rejects_whole_request() -> AppResult<()> {
        let guard = guard()?;
        let request = AdmissionRequest::new(
            "user-2",
            OperationKind::FormSubmission,
            "create_transaction",
        )
        .with_field("description", "Coffee")
        .with_field("category", "<script>alert(1)</script>");

        let result = guard.admit(&request);
        assert!(matches!(result, Err(AppError::SuspiciousInput(_))));
        assert_eq!(
            guard
                .detector()
                .suspicion_record("user-2")
                .map(|record| record.count),
            Some(1)
        );
        Ok(())
    }

    #[test]
    fn rate_limit_is_checked_before_content() -> AppResult<()> {
        let guard = guard()?;
        let request = AdmissionRequest::new(
            "user-3",
            OperationKind::PasswordChange,
            "change_password",
        )
        .with_custom_limit(1)
        .with_field("note", "drop table users");

        assert!(matches!(
            guard.admit(&request),
            Err(AppError::SuspiciousInput(_))
        ));
        assert!(matches!(guard.admit(&request), Err(AppError::RateLimited(_))));
        assert_eq!(
            guard
                .detector()
                .suspicion_record("user-3")
                .map(|record| record.count),
            Some(1)
        );
        Ok(())
    }

    #[test]
    fn blocked_user_is_rejected_before_rate_limit() -> AppResult<()> {
        let guard = guard()?;
        for _ in 0..3 {
            guard
                .detector()
                .detect_bypass_attempt("__proto__", "user-4", "profile_form");
        }

        let request = AdmissionRequest::new(
            "user-4",
            OperationKind::FormSubmission,
            "create_transaction",
        )
        .with_field("description", "Salary");
        assert!(matches!(guard.admit(&request), Err(AppError::UserBlocked(_))));
        assert_eq!(
            guard
                .rate_limits()
                .attempt_count("user-4", &OperationKind::FormSubmission),
            None
        );
        Ok(())
    }

    #[test]
    fn identifier_override_partitions_rate_limit() -> AppResult<()> {
        let guard = guard()?;
        let request = AdmissionRequest::new("user-5", OperationKind::Login, "login")
            .with_identifier("203.0.113.7")
            .with_custom_limit(1);

        guard.admit(&request)?;
        assert!(matches!(guard.admit(&request), Err(AppError::RateLimited(_))));
        assert_eq!(
            guard
                .rate_limits()
                .attempt_count("user-5", &OperationKind::Login),
            None
        );
        Ok(())
    }

    #[test]
    fn record_success_clears_attempts() -> AppResult<()> {
        let guard = guard()?;
        let request =
            AdmissionRequest::new("user-6", OperationKind::PasswordChange, "change_password");

        guard.admit(&request)?;
        guard.admit(&request)?;
        guard.record_success("user-6", &OperationKind::PasswordChange);

        assert_eq!(
            guard
                .rate_limits()
                .attempt_count("user-6", &OperationKind::PasswordChange),
            None
        );
        Ok(())
    }
}
