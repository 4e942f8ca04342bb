use serde::Serialize;

/// Aggregate view over suspicion records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityMetrics {
    /// Sum of suspicious hits across the selected records.
    pub total_suspicious_activities: u64,
    /// Selected users currently blocked.
    pub blocked_users: usize,
    /// Selected users whose last hit falls inside the recent window.
    pub recent_attempts: usize,
    /// Most frequent signatures, highest first.
    pub top_threats: Vec<ThreatCount>,
}

/// Hit count for one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatCount {
    /// Signature name.
    pub signature: String,
    /// Hits recorded for the signature.
    pub count: u64,
}
