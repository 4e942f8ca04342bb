use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of identifier characters kept visible by [`mask_identifier`].
const MASK_VISIBLE_CHARS: usize = 4;

/// Security event categories forwarded to the audit sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    /// Successful or failed sign-in.
    Login,
    /// Session termination.
    Logout,
    /// Password was changed.
    PasswordChange,
    /// Input matched an attack signature.
    SuspiciousActivity,
    /// Security configuration or account state changed administratively.
    ConfigChange,
    /// Repeated suspicious input led to a block.
    BypassAttempt,
    /// Admission was refused by the rate limiter.
    RateLimitExceeded,
}

impl SecurityEventType {
    /// Returns a stable storage value for this event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::PasswordChange => "password_change",
            Self::SuspiciousActivity => "suspicious_activity",
            Self::ConfigChange => "config_change",
            Self::BypassAttempt => "bypass_attempt",
            Self::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

/// Event severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Warning-level.
    Medium,
    /// Needs review.
    High,
    /// Needs immediate attention.
    Critical,
}

impl Severity {
    /// Returns a stable storage value for this severity.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Write-once security record handed to the audit sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Masked user or caller identifier.
    pub user_id: String,
    /// Event category.
    pub event_type: SecurityEventType,
    /// Event severity.
    pub severity: Severity,
    /// Call site label, if any.
    pub context: Option<String>,
    /// Whether the subject is blocked after this event.
    pub blocked: bool,
    /// Free-form details. Never carries raw user input.
    pub details: Map<String, Value>,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl SecurityEvent {
    /// Creates an event for a subject; the identifier is masked on the way in.
    #[must_use]
    pub fn new(
        subject: &str,
        event_type: SecurityEventType,
        severity: Severity,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: mask_identifier(subject),
            event_type,
            severity,
            context: None,
            blocked: false,
            details: Map::new(),
            occurred_at,
        }
    }

    /// Sets the call site label.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the blocked flag.
    #[must_use]
    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// Adds a detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Masks an identifier for logs, keeping a short prefix.
#[must_use]
pub fn mask_identifier(identifier: &str) -> String {
    if identifier.chars().count() <= MASK_VISIBLE_CHARS {
        return "***".to_owned();
    }

    let prefix: String = identifier.chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{prefix}***")
}
