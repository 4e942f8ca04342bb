use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use finguard_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a random transaction identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TransactionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money in.
    Income,
    /// Money out.
    Expense,
}

/// Persisted transaction owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    owner: String,
    description: NonEmptyString,
    category: NonEmptyString,
    kind: TransactionKind,
    amount_minor: i64,
    occurred_on: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a validated transaction.
    pub fn new(
        owner: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        occurred_on: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if amount_minor <= 0 {
            return Err(AppError::Validation(
                "transaction amount must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            id: TransactionId::new(),
            owner: NonEmptyString::new(owner)?.into(),
            description: NonEmptyString::new(description)?,
            category: NonEmptyString::new(category)?,
            kind,
            amount_minor,
            occurred_on,
            created_at,
        })
    }

    /// Returns the transaction identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the owning user subject.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the category label.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Returns the direction.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// Returns the booking date.
    #[must_use]
    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_on
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the signed amount: negative for expenses.
    #[must_use]
    pub fn signed_amount_minor(&self) -> i64 {
        match self.kind {
            TransactionKind::Income => self.amount_minor,
            TransactionKind::Expense => -self.amount_minor,
        }
    }
}
