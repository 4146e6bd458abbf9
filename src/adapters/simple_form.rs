//! Simple form adapter: contact forms that post a flat set of named values.
//!
//! Only plain string values feed the blob; list-valued fields (checkbox
//! groups and the like) carry no useful spam signal and are skipped. A
//! submission the host already flagged as spam is returned as-is — an
//! existing determination is never overridden.

use crate::adapters::join_values;
use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::verdict::CheckKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Items(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct SimpleFormSubmission {
    /// Posted fields in insertion order.
    pub fields: Vec<(String, FieldValue)>,
    /// Upstream spam determination, set by an earlier filter in the host chain.
    pub already_flagged: bool,
}

impl SimpleFormSubmission {
    pub fn with_text_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), FieldValue::Text(v.into())))
                .collect(),
            already_flagged: false,
        }
    }
}

pub struct SimpleFormAdapter;

impl SimpleFormAdapter {
    /// All non-empty string field values, insertion order, newline-joined.
    pub fn extract_text(submission: &SimpleFormSubmission) -> String {
        join_values(submission.fields.iter().filter_map(|(_, v)| match v {
            FieldValue::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }))
    }

    /// Returns the submission's spam signal: `true` means reject.
    pub async fn screen(
        shield: &SpamShield,
        config: &ShieldConfig,
        submission: &SimpleFormSubmission,
        meta: &RequestMeta,
    ) -> bool {
        // Do not override an existing spam determination.
        if submission.already_flagged {
            return true;
        }

        let content = Self::extract_text(submission);
        let result = shield.check(config, &content, CheckKind::Email, meta).await;
        result.is_spam
    }
}
