use std::collections::HashMap;

use chrono::Duration;
use finguard_core::{AppError, AppResult};
use finguard_domain::OperationKind;

/// Ceilings and window length for the rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    window: Duration,
    default_max_attempts: u32,
    operation_limits: HashMap<OperationKind, u32>,
    sweep_interval: std::time::Duration,
}

impl RateLimitConfig {
    /// Default window length in milliseconds.
    pub const DEFAULT_WINDOW_MS: i64 = 60_000;
    /// Default ceiling for operations without a configured limit.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    /// Default interval between expired-record sweeps.
    pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 5 * 60;
    /// Longest accepted window.
    pub const MAX_WINDOW_DAYS: i64 = 365;

    /// Creates a configuration with the given window and built-in ceilings.
    pub fn new(window: Duration) -> AppResult<Self> {
        if window <= Duration::zero() {
            return Err(AppError::Validation(
                "rate limit window must be greater than zero".to_owned(),
            ));
        }

        if window > Duration::days(Self::MAX_WINDOW_DAYS) {
            return Err(AppError::Validation(format!(
                "rate limit window must not exceed {} days",
                Self::MAX_WINDOW_DAYS
            )));
        }

        Ok(Self {
            window,
            ..Self::default()
        })
    }

    /// Overrides the ceiling for one operation.
    pub fn with_operation_limit(
        mut self,
        operation: OperationKind,
        max_attempts: u32,
    ) -> AppResult<Self> {
        if max_attempts == 0 {
            return Err(AppError::Validation(format!(
                "rate limit for '{operation}' must be greater than zero"
            )));
        }

        self.operation_limits.insert(operation, max_attempts);
        Ok(self)
    }

    /// Overrides the ceiling used for operations without their own limit.
    pub fn with_default_max_attempts(mut self, max_attempts: u32) -> AppResult<Self> {
        if max_attempts == 0 {
            return Err(AppError::Validation(
                "default rate limit must be greater than zero".to_owned(),
            ));
        }

        self.default_max_attempts = max_attempts;
        Ok(self)
    }

    /// Overrides the sweep interval.
    #[must_use]
    pub fn with_sweep_interval(mut self, sweep_interval: std::time::Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Returns the window length.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns the sweep interval.
    #[must_use]
    pub fn sweep_interval(&self) -> std::time::Duration {
        self.sweep_interval
    }

    /// Returns the ceiling applied to an operation.
    #[must_use]
    pub fn limit_for(&self, operation: &OperationKind) -> u32 {
        self.operation_limits
            .get(operation)
            .copied()
            .unwrap_or(self.default_max_attempts)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let operation_limits = OperationKind::builtin()
            .iter()
            .filter_map(|operation| {
                operation
                    .default_max_attempts()
                    .map(|limit| (operation.clone(), limit))
            })
            .collect();

        Self {
            window: Duration::milliseconds(Self::DEFAULT_WINDOW_MS),
            default_max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            operation_limits,
            sweep_interval: std::time::Duration::from_secs(Self::DEFAULT_SWEEP_INTERVAL_SECONDS),
        }
    }
}
