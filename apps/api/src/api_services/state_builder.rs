use std::sync::Arc;

use finguard_application::{
    AdmissionGuard, Clock, ProfileService, RateLimitService, SecurityEventPublisher,
    SuspiciousActivityService, SystemClock, TransactionService,
};
use finguard_core::AppError;
use finguard_infrastructure::{
    Argon2PasswordHasher, InMemoryCredentialRepository, InMemoryTransactionRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(
    config: &ApiConfig,
    events: SecurityEventPublisher,
) -> Result<AppState, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let rate_limits =
        RateLimitService::new(config.rate_limit.clone(), clock.clone(), events.clone());
    let detector = SuspiciousActivityService::new(
        config.suspicious_activity.clone(),
        clock.clone(),
        events.clone(),
    )?;
    let admission_guard = AdmissionGuard::new(rate_limits, detector);

    Ok(AppState {
        transaction_service: TransactionService::new(
            Arc::new(InMemoryTransactionRepository::new()),
            admission_guard.clone(),
            clock.clone(),
        ),
        profile_service: ProfileService::new(
            Arc::new(InMemoryCredentialRepository::new()),
            Arc::new(Argon2PasswordHasher::new()),
            admission_guard.clone(),
            clock,
            events,
        ),
        admission_guard,
        admin_token: config.admin_token.clone(),
    })
}
