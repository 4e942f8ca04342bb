use finguard_application::{SecurityMetrics, ThreatCount};
use finguard_domain::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming payload for transaction creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-transaction-request.ts"
)]
pub struct CreateTransactionRequest {
    pub description: String,
    pub category: String,
    /// Either `income` or `expense`.
    pub kind: String,
    #[ts(type = "number")]
    pub amount_minor: i64,
    /// ISO-8601 calendar date.
    pub occurred_on: String,
}

/// API representation of a transaction.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/transaction-response.ts"
)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    #[ts(type = "number")]
    pub amount_minor: i64,
    pub occurred_on: String,
    pub created_at: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(value: Transaction) -> Self {
        Self {
            transaction_id: value.id().to_string(),
            description: value.description().to_owned(),
            category: value.category().to_owned(),
            kind: match value.kind() {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
            }
            .to_owned(),
            amount_minor: value.amount_minor(),
            occurred_on: value.occurred_on().to_string(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Incoming payload for setting the first password.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-password-request.ts"
)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Incoming payload for password changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/change-password-request.ts"
)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// API representation of aggregated security metrics.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/security-metrics-response.ts"
)]
pub struct SecurityMetricsResponse {
    #[ts(type = "number")]
    pub total_suspicious_activities: u64,
    pub blocked_users: usize,
    pub recent_attempts: usize,
    pub top_threats: Vec<ThreatCountResponse>,
}

/// One signature and its hit count.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/threat-count-response.ts"
)]
pub struct ThreatCountResponse {
    pub signature: String,
    #[ts(type = "number")]
    pub count: u64,
}

impl From<ThreatCount> for ThreatCountResponse {
    fn from(value: ThreatCount) -> Self {
        Self {
            signature: value.signature,
            count: value.count,
        }
    }
}

impl From<SecurityMetrics> for SecurityMetricsResponse {
    fn from(value: SecurityMetrics) -> Self {
        Self {
            total_suspicious_activities: value.total_suspicious_activities,
            blocked_users: value.blocked_users,
            recent_attempts: value.recent_attempts,
            top_threats: value
                .top_threats
                .into_iter()
                .map(ThreatCountResponse::from)
                .collect(),
        }
    }
}

/// Result of an administrative suspicion reset.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/unblock-user-response.ts"
)]
pub struct UnblockUserResponse {
    pub user_id: String,
    pub reset: bool,
}
