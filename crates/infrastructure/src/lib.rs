//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod http_audit_sink;
mod in_memory_credential_repository;
mod in_memory_transaction_repository;
mod postgres_audit_sink;
mod tracing_audit_sink;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use http_audit_sink::{HttpAuditSink, HttpAuditSinkConfig};
pub use in_memory_credential_repository::InMemoryCredentialRepository;
pub use in_memory_transaction_repository::InMemoryTransactionRepository;
pub use postgres_audit_sink::PostgresAuditSink;
pub use tracing_audit_sink::TracingAuditSink;
