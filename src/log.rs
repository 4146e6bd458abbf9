//! log.rs — append-only record of every successful spam check, with aggregate
//! statistics and paged/filtered retrieval.
//!
//! Append is the only mutating path besides clear, so one coarse lock per
//! operation is enough: ids stay unique and monotonic under concurrent
//! appends, and listing stays stable for offset pagination. Entries are
//! immutable after insert and only leave via a token-confirmed `clear`.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::verdict::CheckKind;

/// Content is stored truncated to its first 1000 characters.
pub const CONTENT_CAP: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonically increasing, assigned at insert.
    pub id: u64,
    pub content: String,
    /// Final decision (post-threshold), not the raw verdict.
    pub is_spam: bool,
    pub confidence: f32,
    pub kind: CheckKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Best-effort request metadata; may be empty.
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    /// Unix seconds, assigned at insert.
    pub created_at: i64,
}

/// Fields the caller supplies; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub content: String,
    pub is_spam: bool,
    pub confidence: f32,
    pub kind: CheckKind,
    pub flags: Vec<String>,
    pub ip_address: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFilter {
    #[default]
    All,
    Spam,
    Legitimate,
}

impl LogFilter {
    fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Spam => entry.is_spam,
            LogFilter::Legitimate => !entry.is_spam,
        }
    }
}

/// Aggregates over all rows, regardless of filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogStats {
    pub total_checks: usize,
    pub total_spam: usize,
    pub total_legitimate: usize,
    pub avg_confidence: f32,
}

/// One-time confirmation for the destructive `clear` operation. Obtained from
/// `issue_clear_token`, consumed by the first `clear` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearToken(pub u64);

#[derive(Debug, Default)]
struct LogState {
    entries: Vec<LogEntry>,
    next_id: u64,
    pending_clear: Option<u64>,
    token_seq: u64,
}

#[derive(Debug, Default)]
pub struct CheckLog {
    inner: Mutex<LogState>,
}

impl CheckLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist one record; assigns id and timestamp and truncates content.
    /// Call only for successful checks with logging enabled.
    pub fn append(&self, new: NewLogEntry) -> u64 {
        let created_at = now_unix();
        let mut state = self.inner.lock().expect("check log mutex poisoned");
        state.next_id += 1;
        let id = state.next_id;
        let content = if new.content.chars().count() > CONTENT_CAP {
            new.content.chars().take(CONTENT_CAP).collect()
        } else {
            new.content
        };
        state.entries.push(LogEntry {
            id,
            content,
            is_spam: new.is_spam,
            confidence: new.confidence,
            kind: new.kind,
            flags: new.flags,
            ip_address: new.ip_address,
            user_agent: new.user_agent,
            created_at,
        });
        id
    }

    /// Newest-first page of entries matching `filter`, plus the filtered
    /// total. `page` is 1-based and clamped to >= 1; a page past the end is
    /// empty but still reports the total.
    pub fn query(
        &self,
        filter: LogFilter,
        page: usize,
        page_size: usize,
    ) -> (Vec<LogEntry>, usize) {
        let state = self.inner.lock().expect("check log mutex poisoned");
        // Ids are monotonic, so reverse insertion order is created_at descending.
        let matching: Vec<&LogEntry> = state
            .entries
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .collect();
        let total = matching.len();
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(page_size);
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(page_size)
            .cloned()
            .collect();
        (rows, total)
    }

    /// Aggregate scan over all rows.
    pub fn stats(&self) -> LogStats {
        let state = self.inner.lock().expect("check log mutex poisoned");
        let total_checks = state.entries.len();
        let total_spam = state.entries.iter().filter(|e| e.is_spam).count();
        let sum: f32 = state.entries.iter().map(|e| e.confidence).sum();
        LogStats {
            total_checks,
            total_spam,
            total_legitimate: total_checks - total_spam,
            avg_confidence: if total_checks == 0 {
                0.0
            } else {
                sum / total_checks as f32
            },
        }
    }

    /// Issue the confirmation token for the next `clear`. Issuing a new token
    /// invalidates any previously issued one.
    pub fn issue_clear_token(&self) -> ClearToken {
        let mut state = self.inner.lock().expect("check log mutex poisoned");
        state.token_seq += 1;
        // Mix in the clock so tokens are not guessable from a fresh process.
        let token = state.token_seq.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (now_unix() as u64);
        state.pending_clear = Some(token);
        ClearToken(token)
    }

    /// Irreversibly delete all records. Returns how many rows were removed,
    /// or `None` when the token is missing, stale, or already used.
    pub fn clear(&self, token: ClearToken) -> Option<usize> {
        let mut state = self.inner.lock().expect("check log mutex poisoned");
        if state.pending_clear.take() != Some(token.0) {
            return None;
        }
        let removed = state.entries.len();
        state.entries.clear();
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("check log mutex poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
