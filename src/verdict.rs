//! verdict.rs — Wire-level and pipeline-level result types for spam checks.
//!
//! A `Verdict` is what the remote classifier said (pre-threshold); a
//! `CheckResult` is what the pipeline hands back to adapters after the
//! threshold policy and logging ran. Keeping both shapes explicit makes the
//! fail-open rule testable: an error verdict never turns into a spam result.

use serde::{Deserialize, Serialize};

/// Raw classification result from the remote service, before threshold policy.
///
/// `confidence` is only meaningful when `error` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Remote raw verdict, pre-threshold.
    pub is_spam: bool,
    /// Classifier confidence in `<0.0, 1.0>`.
    pub confidence: f32,
    /// Optional keyword/reason tags, may be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Diagnostic field some deployments of the classifier return; never
    /// guaranteed to be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Set when the call failed; other fields are undefined in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verdict {
    /// Successful classification with no flags.
    pub fn clean(is_spam: bool, confidence: f32) -> Self {
        Self {
            is_spam,
            confidence,
            flags: Vec::new(),
            method: None,
            error: None,
        }
    }

    /// Failed call; the adapter boundary treats this as not-spam (fail open).
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_spam: false,
            confidence: 0.0,
            flags: Vec::new(),
            method: None,
            error: Some(message.into()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Builder-style helper used by tests and the mock client.
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }
}

/// Which source adapter produced the content under check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Comment,
    Email,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Comment => "comment",
            CheckKind::Email => "email",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final pipeline output handed to adapters and the `/check` endpoint.
///
/// `is_spam` here is the post-threshold decision, not the raw verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub is_spam: bool,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// Not-spam outcome for any failed check (fail open).
    pub fn fail_open(message: impl Into<String>) -> Self {
        Self {
            is_spam: false,
            confidence: 0.0,
            flags: Vec::new(),
            method: None,
            error: Some(message.into()),
        }
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}
