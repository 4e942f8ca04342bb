//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod operation;
mod security;
mod threat;
mod transaction;

pub use operation::OperationKind;
pub use security::{SecurityEvent, SecurityEventType, Severity, mask_identifier};
pub use threat::{THREAT_SIGNATURES, ThreatCategory, ThreatSignature};
pub use transaction::{Transaction, TransactionId, TransactionKind};
