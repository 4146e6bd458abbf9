// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod engine;
pub mod log;
pub mod metrics;
pub mod policy;
pub mod verdict;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::client::{DynSpamClient, HttpSpamClient, MockSpamClient, SpamClient};
pub use crate::config::ShieldConfig;
pub use crate::engine::{RequestMeta, SpamShield};
pub use crate::log::{CheckLog, LogEntry, LogFilter, LogStats};
pub use crate::verdict::{CheckKind, CheckResult, Verdict};
