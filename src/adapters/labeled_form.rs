//! Labeled form adapter: hosts whose entries are a list of named fields, each
//! with a `value` sub-field and its own error slot.
//!
//! On a spam decision the rejection message is attached to the error slot of
//! the first field that contributed content, so the host renders it next to
//! the offending input instead of as a generic submission-level error.

use crate::adapters::join_values;
use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::verdict::CheckKind;

pub const SPAM_REJECTION_MESSAGE: &str = "Your submission has been flagged as spam.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledField {
    pub name: String,
    pub value: String,
    /// Per-field error slot the host renders back to the visitor.
    pub error: Option<String>,
}

impl LabeledField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabeledEntry {
    pub fields: Vec<LabeledField>,
}

impl LabeledEntry {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| LabeledField::new(k, v))
                .collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }
}

pub struct LabeledFormAdapter;

impl LabeledFormAdapter {
    /// Each field's value when non-empty, newline-joined.
    pub fn extract_text(entry: &LabeledEntry) -> String {
        join_values(
            entry
                .fields
                .iter()
                .filter(|f| !f.value.is_empty())
                .map(|f| f.value.as_str()),
        )
    }

    /// Run the check and, on spam, attach the rejection message to the first
    /// content-carrying field. Returns the (possibly annotated) entry.
    pub async fn screen(
        shield: &SpamShield,
        config: &ShieldConfig,
        mut entry: LabeledEntry,
        meta: &RequestMeta,
    ) -> LabeledEntry {
        let content = Self::extract_text(&entry);
        let result = shield.check(config, &content, CheckKind::Email, meta).await;

        if result.is_spam {
            if let Some(field) = entry.fields.iter_mut().find(|f| !f.value.is_empty()) {
                field.error = Some(SPAM_REJECTION_MESSAGE.to_string());
            }
        }
        entry
    }
}
