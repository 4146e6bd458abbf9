//! Verdict client: provider abstraction over the remote spam classifier.
//! One POST per check, bounded timeout, no retry — a failed attempt yields an
//! error verdict and the caller decides remediation (fail open by default).

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ShieldConfig;
use crate::verdict::Verdict;

/// Trait object used by the pipeline engine and tests.
#[async_trait::async_trait]
pub trait SpamClient: Send + Sync {
    /// Classify one text blob. Failures are reported inside the `Verdict`
    /// (`error` set), never as a panic or a Rust-level error.
    async fn classify(&self, content: &str) -> Verdict;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynSpamClient = Arc<dyn SpamClient>;

/// Wire request body: `{"content": "..."}`.
#[derive(Serialize)]
struct CheckRequest<'a> {
    content: &'a str,
}

/// Expected 200 body. A body that fails to decode, or decodes without
/// `is_spam`, is a protocol error.
#[derive(Deserialize)]
struct CheckResponse {
    is_spam: bool,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    method: Option<String>,
}

/// HTTP client for the hosted classifier endpoint.
pub struct HttpSpamClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    origin_domain: String,
}

impl HttpSpamClient {
    /// Transport parameters (endpoint, credential, timeout, origin) are fixed
    /// at construction; rebuild the client after a config reload.
    pub fn new(config: &ShieldConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("ai-spam-shield/0.1 (+github.com/scorepixel/ai-spam-shield)")
            .connect_timeout(Duration::from_secs(4).min(Duration::from_secs(config.timeout_secs)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
            origin_domain: config.origin_domain.clone(),
        })
    }
}

#[async_trait::async_trait]
impl SpamClient for HttpSpamClient {
    async fn classify(&self, content: &str) -> Verdict {
        let mut req = self
            .http
            .post(&self.endpoint)
            .header("X-Origin-Domain", &self.origin_domain)
            .json(&CheckRequest { content });
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        // Transport failure (DNS/connect/timeout): no response at all.
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => return Verdict::failure(e.to_string()),
        };

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if status != reqwest::StatusCode::OK {
            // The classifier puts its error message in the body; fall back to
            // the status line when the body is empty.
            let msg = if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            };
            return Verdict::failure(msg);
        }

        match serde_json::from_str::<CheckResponse>(&body) {
            Ok(parsed) => Verdict {
                is_spam: parsed.is_spam,
                confidence: parsed.confidence,
                flags: parsed.flags,
                method: parsed.method,
                error: None,
            },
            Err(_) => Verdict::failure("Invalid response"),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Deterministic client for tests and local runs: returns a fixed verdict.
#[derive(Clone)]
pub struct MockSpamClient {
    pub fixed: Verdict,
}

impl MockSpamClient {
    pub fn spam(confidence: f32) -> Self {
        Self {
            fixed: Verdict::clean(true, confidence),
        }
    }

    pub fn legitimate(confidence: f32) -> Self {
        Self {
            fixed: Verdict::clean(false, confidence),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fixed: Verdict::failure(message),
        }
    }
}

#[async_trait::async_trait]
impl SpamClient for MockSpamClient {
    async fn classify(&self, _content: &str) -> Verdict {
        self.fixed.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
