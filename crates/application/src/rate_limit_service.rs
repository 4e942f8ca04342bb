//! In-memory fixed-window rate limiting.
//!
//! Each `(operation, identifier)` key owns a counter and an absolute window
//! end. The window is fixed, not sliding: a caller straddling a boundary can
//! pass up to twice the ceiling. State is per process.

mod config;
mod service;


pub use config::RateLimitConfig;
pub use service::{RateLimitRecord, RateLimitService};
