use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use finguard_core::{AppResult, UserIdentity};
use finguard_domain::{OperationKind, Transaction, TransactionKind};
use tracing::info;

use crate::admission_guard::{AdmissionGuard, AdmissionRequest};
use crate::clock::Clock;

/// Repository port for transaction persistence.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Stores a new transaction.
    async fn insert_transaction(&self, transaction: Transaction) -> AppResult<()>;

    /// Lists a user's transactions, newest booking date first.
    async fn list_transactions(&self, owner: &str) -> AppResult<Vec<Transaction>>;
}

/// Input payload for transaction creation.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Free-text description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Direction.
    pub kind: TransactionKind,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Booking date.
    pub occurred_on: NaiveDate,
}

/// Application service for transaction writes behind admission control.
#[derive(Clone)]
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
    guard: AdmissionGuard,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    /// Creates a service from its collaborators.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TransactionRepository>,
        guard: AdmissionGuard,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            guard,
            clock,
        }
    }

    /// Admits and persists a new transaction.
    pub async fn create_transaction(
        &self,
        actor: &UserIdentity,
        input: CreateTransactionInput,
    ) -> AppResult<Transaction> {
        self.guard.admit(
            &AdmissionRequest::new(
                actor.subject(),
                OperationKind::FormSubmission,
                "create_transaction",
            )
            .with_field("description", &input.description)
            .with_field("category", &input.category),
        )?;

        let transaction = Transaction::new(
            actor.subject(),
            input.description,
            input.category,
            input.kind,
            input.amount_minor,
            input.occurred_on,
            self.clock.now(),
        )?;
        self.repository
            .insert_transaction(transaction.clone())
            .await?;

        info!(
            transaction_id = %transaction.id(),
            kind = ?transaction.kind(),
            "transaction created"
        );
        Ok(transaction)
    }

    /// Lists the actor's transactions.
    pub async fn list_transactions(&self, actor: &UserIdentity) -> AppResult<Vec<Transaction>> {
        self.repository.list_transactions(actor.subject()).await
    }
}
