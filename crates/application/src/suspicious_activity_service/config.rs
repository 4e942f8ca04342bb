use chrono::Duration;
use finguard_core::{AppError, AppResult};

/// Longest accepted block or recent window.
const MAX_WINDOW_DAYS: i64 = 365;

/// Thresholds for suspicion tracking.
#[derive(Debug, Clone)]
pub struct SuspiciousActivityConfig {
    /// Hits inside `block_window` that block a user.
    pub block_threshold: u32,
    /// Trailing window for counting hits toward a block.
    pub block_window: Duration,
    /// Trailing window for the `recent_attempts` metric.
    pub recent_window: Duration,
    /// Maximum entries reported in `top_threats`.
    pub top_threats_limit: usize,
}

impl SuspiciousActivityConfig {
    /// Validates the thresholds.
    pub fn validate(&self) -> AppResult<()> {
        if self.block_threshold == 0 {
            return Err(AppError::Validation(
                "suspicion block threshold must be greater than zero".to_owned(),
            ));
        }

        if self.block_window <= Duration::zero() || self.recent_window <= Duration::zero() {
            return Err(AppError::Validation(
                "suspicion windows must be greater than zero".to_owned(),
            ));
        }

        let max_window = Duration::days(MAX_WINDOW_DAYS);
        if self.block_window > max_window || self.recent_window > max_window {
            return Err(AppError::Validation(format!(
                "suspicion windows must not exceed {MAX_WINDOW_DAYS} days"
            )));
        }

        Ok(())
    }
}

impl Default for SuspiciousActivityConfig {
    fn default() -> Self {
        Self {
            block_threshold: 3,
            block_window: Duration::hours(1),
            recent_window: Duration::hours(24),
            top_threats_limit: 5,
        }
    }
}
