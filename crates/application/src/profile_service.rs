use std::sync::Arc;

use async_trait::async_trait;
use finguard_core::{AppError, AppResult, UserIdentity};
use finguard_domain::{OperationKind, SecurityEvent, SecurityEventType, Severity};
use tracing::info;

use crate::admission_guard::{AdmissionGuard, AdmissionRequest};
use crate::clock::Clock;
use crate::security_event_service::SecurityEventPublisher;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;
/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Port for password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Repository port for stored credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Returns the stored password hash for a subject.
    async fn find_password_hash(&self, subject: &str) -> AppResult<Option<String>>;

    /// Stores or replaces the password hash for a subject.
    async fn store_password_hash(&self, subject: &str, password_hash: String) -> AppResult<()>;
}

/// Application service for profile credential changes.
#[derive(Clone)]
pub struct ProfileService {
    credentials: Arc<dyn CredentialRepository>,
    hasher: Arc<dyn PasswordHasher>,
    guard: AdmissionGuard,
    clock: Arc<dyn Clock>,
    events: SecurityEventPublisher,
}

impl ProfileService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        hasher: Arc<dyn PasswordHasher>,
        guard: AdmissionGuard,
        clock: Arc<dyn Clock>,
        events: SecurityEventPublisher,
    ) -> Self {
        Self {
            credentials,
            hasher,
            guard,
            clock,
            events,
        }
    }

    /// Sets the first password for an account without one.
    pub async fn set_initial_password(
        &self,
        actor: &UserIdentity,
        password: &str,
    ) -> AppResult<()> {
        self.guard.admit(&AdmissionRequest::new(
            actor.subject(),
            OperationKind::PasswordChange,
            "set_initial_password",
        ))?;
        validate_password(password)?;

        if self
            .credentials
            .find_password_hash(actor.subject())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "a password is already set for this account".to_owned(),
            ));
        }

        let password_hash = self.hasher.hash_password(password)?;
        self.credentials
            .store_password_hash(actor.subject(), password_hash)
            .await
    }

    /// Changes the password after verifying the current one.
    ///
    /// Failed verifications keep counting toward the `password_change`
    /// ceiling; a successful change resets it.
    pub async fn change_password(
        &self,
        actor: &UserIdentity,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let operation = OperationKind::PasswordChange;
        self.guard.admit(&AdmissionRequest::new(
            actor.subject(),
            operation.clone(),
            "change_password",
        ))?;
        validate_password(new_password)?;
        if current_password == new_password {
            return Err(AppError::Validation(
                "new password must differ from the current password".to_owned(),
            ));
        }

        let stored_hash = self
            .credentials
            .find_password_hash(actor.subject())
            .await?
            .ok_or_else(|| AppError::NotFound("no password is set for this account".to_owned()))?;

        if !self.hasher.verify_password(current_password, &stored_hash)? {
            self.events.publish(
                SecurityEvent::new(
                    actor.subject(),
                    SecurityEventType::PasswordChange,
                    Severity::Medium,
                    self.clock.now(),
                )
                .with_context("change_password")
                .with_detail("outcome", "failure"),
            );
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        let password_hash = self.hasher.hash_password(new_password)?;
        self.credentials
            .store_password_hash(actor.subject(), password_hash)
            .await?;
        self.guard.record_success(actor.subject(), &operation);

        info!("password changed");
        self.events.publish(
            SecurityEvent::new(
                actor.subject(),
                SecurityEventType::PasswordChange,
                Severity::Low,
                self.clock.now(),
            )
            .with_context("change_password")
            .with_detail("outcome", "success"),
        );

        Ok(())
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(AppError::Validation(format!(
            "password must be between {PASSWORD_MIN_LENGTH} and {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}
