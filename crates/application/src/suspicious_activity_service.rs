//! Signature-based screening of free text with escalating lockout.
//!
//! The screen is syntactic: benign text containing a signature is rejected
//! and obfuscated payloads slip through. Parameterized queries and output
//! encoding stay the persistence and rendering layers' job.

mod config;
mod metrics;
mod service;
mod signatures;

#[cfg(test)]
mod tests;

pub use config::SuspiciousActivityConfig;
pub use metrics::{SecurityMetrics, ThreatCount};
pub use service::{SuspicionRecord, SuspiciousActivityService};
