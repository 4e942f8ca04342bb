use std::fmt::{Display, Formatter};
use std::str::FromStr;

use finguard_core::AppError;
use serde::{Deserialize, Serialize};

/// Mutating operation classes subject to admission control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Credential login attempts.
    Login,
    /// Password change requests.
    PasswordChange,
    /// Generic form submissions (transactions, categories, accounts).
    FormSubmission,
    /// Calls to serverless functions.
    ApiCall,
    /// Direct data API requests.
    ApiRequest,
    /// Caller-defined operation name.
    Custom(String),
}

impl OperationKind {
    /// Returns a stable storage value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::PasswordChange => "password_change",
            Self::FormSubmission => "form_submission",
            Self::ApiCall => "api_call",
            Self::ApiRequest => "api_request",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Returns the built-in attempt ceiling, or `None` for custom operations.
    #[must_use]
    pub fn default_max_attempts(&self) -> Option<u32> {
        match self {
            Self::Login => Some(5),
            Self::PasswordChange => Some(3),
            Self::FormSubmission => Some(10),
            Self::ApiCall => Some(60),
            Self::ApiRequest => Some(30),
            Self::Custom(_) => None,
        }
    }

    /// Returns all built-in operations.
    #[must_use]
    pub fn builtin() -> &'static [Self] {
        const BUILTIN: &[OperationKind] = &[
            OperationKind::Login,
            OperationKind::PasswordChange,
            OperationKind::FormSubmission,
            OperationKind::ApiCall,
            OperationKind::ApiRequest,
        ];

        BUILTIN
    }
}

impl Display for OperationKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(
                "operation name must not be empty".to_owned(),
            ));
        }

        Ok(match value {
            "login" => Self::Login,
            "password_change" => Self::PasswordChange,
            "form_submission" => Self::FormSubmission,
            "api_call" => Self::ApiCall,
            "api_request" => Self::ApiRequest,
            custom => Self::Custom(custom.to_owned()),
        })
    }
}
