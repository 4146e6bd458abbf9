//! Keyed form adapter: hosts that hand over one entry map mixing numeric
//! field ids with metadata keys (`source_url`, `user_agent`, ...). Only the
//! purely numeric keys carry user-typed content; everything else is ignored.

use crate::adapters::join_values;
use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::verdict::CheckKind;

#[derive(Debug, Clone, Default)]
pub struct KeyedEntry {
    /// Entry values in insertion order; keys are field ids or metadata names.
    pub values: Vec<(String, String)>,
}

impl KeyedEntry {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

pub struct KeyedFormAdapter;

impl KeyedFormAdapter {
    /// Values of purely numeric keys only, newline-joined.
    pub fn extract_text(entry: &KeyedEntry) -> String {
        join_values(
            entry
                .values
                .iter()
                .filter(|(k, _)| is_numeric_key(k))
                .map(|(_, v)| v.as_str()),
        )
    }

    /// Returns the entry-level spam flag. Unlike the simple form adapter this
    /// runs unconditionally; the host applies the flag on top of whatever
    /// other filters it chains.
    pub async fn screen(
        shield: &SpamShield,
        config: &ShieldConfig,
        entry: &KeyedEntry,
        meta: &RequestMeta,
    ) -> bool {
        let content = Self::extract_text(entry);
        let result = shield.check(config, &content, CheckKind::Email, meta).await;
        result.is_spam
    }
}
