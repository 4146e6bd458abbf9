//! # Check Pipeline
//! Sequences one spam check: build request → call the remote classifier →
//! apply the threshold policy → record the outcome → hand the decision back.
//!
//! Every infrastructure failure is absorbed here as a not-spam result with the
//! error attached; adapters never see a Rust-level error from this path. The
//! check log is only written for successful checks, and exactly once each.

use std::sync::{Arc, RwLock};

use metrics::counter;
use tracing::warn;

use crate::client::DynSpamClient;
use crate::config::ShieldConfig;
use crate::log::{CheckLog, NewLogEntry};
use crate::policy;
use crate::verdict::{CheckKind, CheckResult};

/// Best-effort request metadata carried into the check log.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: String,
    pub user_agent: String,
}

impl RequestMeta {
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Shared pipeline state: one classifier client, one check log.
///
/// The client slot is swappable so a config reload can rebuild transport
/// parameters without touching the log.
pub struct SpamShield {
    client: RwLock<DynSpamClient>,
    log: Arc<CheckLog>,
}

impl SpamShield {
    pub fn new(client: DynSpamClient, log: Arc<CheckLog>) -> Self {
        crate::metrics::ensure_described();
        Self {
            client: RwLock::new(client),
            log,
        }
    }

    pub fn log(&self) -> &CheckLog {
        &self.log
    }

    /// Replace the classifier client (after a config reload).
    pub fn set_client(&self, client: DynSpamClient) {
        let mut slot = self.client.write().expect("client rwlock poisoned");
        *slot = client;
    }

    fn client(&self) -> DynSpamClient {
        Arc::clone(&self.client.read().expect("client rwlock poisoned"))
    }

    /// Run one check. The config snapshot is taken by the caller per incoming
    /// submission, so threshold and logging flags are never stale across a
    /// settings change.
    pub async fn check(
        &self,
        config: &ShieldConfig,
        content: &str,
        kind: CheckKind,
        meta: &RequestMeta,
    ) -> CheckResult {
        counter!("spam_checks_total").increment(1);

        // Input error: short-circuit, no network call, not logged.
        if content.is_empty() {
            return CheckResult::fail_open("Empty content");
        }

        let verdict = self.client().classify(content).await;

        if let Some(err) = &verdict.error {
            // Operational diagnostic stream, not the structured check log.
            warn!(target: "spam_shield", error = %err, kind = %kind, "spam check failed; failing open");
            counter!("spam_check_errors_total").increment(1);
            return CheckResult::fail_open(err.clone());
        }

        let is_spam = policy::decide(&verdict, config.threshold);
        if is_spam {
            counter!("spam_detected_total").increment(1);
        }

        if config.log_enabled {
            self.log.append(NewLogEntry {
                content: content.to_string(),
                is_spam,
                confidence: verdict.confidence,
                kind,
                flags: verdict.flags.clone(),
                ip_address: meta.ip_address.clone(),
                user_agent: meta.user_agent.clone(),
            });
        }

        CheckResult {
            is_spam,
            confidence: verdict.confidence,
            flags: verdict.flags,
            method: verdict.method,
            error: None,
        }
    }
}
