use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use finguard_application::{
    AdmissionGuard, ProfileService, RateLimitConfig, RateLimitService, SecurityEventPublisher,
    SuspiciousActivityConfig, SuspiciousActivityService, SystemClock, TransactionService,
};
use finguard_core::{AppResult, UserIdentity};
use finguard_infrastructure::{
    Argon2PasswordHasher, InMemoryCredentialRepository, InMemoryTransactionRepository,
};

use crate::dto::CreateTransactionRequest;
use crate::state::AppState;

use super::security::SecurityMetricsQuery;
use super::{create_transaction_handler, list_transactions_handler, security_metrics_handler};

fn test_state() -> AppResult<AppState> {
    let clock = Arc::new(SystemClock);
    let events = SecurityEventPublisher::disabled();
    let guard = AdmissionGuard::new(
        RateLimitService::new(RateLimitConfig::default(), clock.clone(), events.clone()),
        SuspiciousActivityService::new(
            SuspiciousActivityConfig::default(),
            clock.clone(),
            events.clone(),
        )?,
    );

    Ok(AppState {
        transaction_service: TransactionService::new(
            Arc::new(InMemoryTransactionRepository::new()),
            guard.clone(),
            clock.clone(),
        ),
        profile_service: ProfileService::new(
            Arc::new(InMemoryCredentialRepository::new()),
            Arc::new(Argon2PasswordHasher::new()),
            guard.clone(),
            clock,
            events,
        ),
        admission_guard: guard,
        admin_token: None,
    })
}

fn request(description: &str) -> CreateTransactionRequest {
    CreateTransactionRequest {
        description: description.to_owned(),
        category: "groceries".to_owned(),
        kind: "expense".to_owned(),
        amount_minor: 4_250,
        occurred_on: "2026-10-18".to_owned(),
    }
}

async fn create_status(state: &AppState, user: &UserIdentity, description: &str) -> StatusCode {
    create_transaction_handler(
        State(state.clone()),
        Extension(user.clone()),
        Json(request(description)),
    )
    .await
    .into_response()
    .status()
}

#[tokio::test]
async fn clean_transaction_is_created() -> AppResult<()> {
    let state = test_state()?;
    let user = UserIdentity::new("user-1", None);

    assert_eq!(
        create_status(&state, &user, "Grocery shopping at SuperMart").await,
        StatusCode::CREATED
    );

    let listed = list_transactions_handler(State(state.clone()), Extension(user))
        .await
        .map(|Json(transactions)| transactions.len())
        .unwrap_or_default();
    assert_eq!(listed, 1);
    Ok(())
}

#[tokio::test]
async fn suspicious_payloads_escalate_to_locked() -> AppResult<()> {
    let state = test_state()?;
    let user = UserIdentity::new("user-7", None);

    for _ in 0..3 {
        assert_eq!(
            create_status(&state, &user, "<script>alert(1)</script>").await,
            StatusCode::BAD_REQUEST
        );
    }
    assert_eq!(
        create_status(&state, &user, "Grocery shopping at SuperMart").await,
        StatusCode::LOCKED
    );

    let metrics = security_metrics_handler(
        State(state.clone()),
        Query(SecurityMetricsQuery {
            user_id: Some("user-7".to_owned()),
        }),
    )
    .await
    .map(|Json(metrics)| (metrics.total_suspicious_activities, metrics.blocked_users))
    .ok();
    assert_eq!(metrics, Some((3, 1)));
    Ok(())
}

#[tokio::test]
async fn form_submissions_are_rate_limited() -> AppResult<()> {
    let state = test_state()?;
    let user = UserIdentity::new("user-9", None);

    for _ in 0..10 {
        assert_eq!(create_status(&state, &user, "Coffee").await, StatusCode::CREATED);
    }
    assert_eq!(
        create_status(&state, &user, "Coffee").await,
        StatusCode::TOO_MANY_REQUESTS
    );
    Ok(())
}

#[tokio::test]
async fn invalid_kind_is_a_bad_request() -> AppResult<()> {
    let state = test_state()?;
    let mut payload = request("Coffee");
    payload.kind = "transfer".to_owned();

    let status = create_transaction_handler(
        State(state),
        Extension(UserIdentity::new("user-10", None)),
        Json(payload),
    )
    .await
    .into_response()
    .status();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
