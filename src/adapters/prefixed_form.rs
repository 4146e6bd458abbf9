//! Prefixed form adapter: hosts whose submissions mix content fields with
//! bookkeeping keys in one map, distinguished by a fixed key prefix.
//!
//! The host does not guarantee the field map is reachable; when the accessor
//! yields nothing, the check is skipped silently and the submission proceeds
//! unchecked (fail open, no error).

use crate::adapters::join_values;
use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::verdict::CheckKind;

/// Content-carrying keys start with this prefix; everything else is
/// bookkeeping (ids, nonces, referrer).
pub const FIELD_PREFIX: &str = "form-field-";

pub const SPAM_REJECTION_MESSAGE: &str = "Your submission was flagged as spam and not sent.";

#[derive(Debug, Clone, Default)]
pub struct PrefixedFormSubmission {
    /// `None` when the host object does not expose its fields through the
    /// expected accessor.
    pub fields: Option<Vec<(String, String)>>,
}

impl PrefixedFormSubmission {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: Some(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// A submission whose field accessor is unavailable.
    pub fn opaque() -> Self {
        Self { fields: None }
    }
}

pub struct PrefixedFormAdapter;

impl PrefixedFormAdapter {
    /// Values of prefixed keys only; `None` when the fields are inaccessible.
    pub fn extract_text(submission: &PrefixedFormSubmission) -> Option<String> {
        let fields = submission.fields.as_ref()?;
        Some(join_values(
            fields
                .iter()
                .filter(|(k, _)| k.starts_with(FIELD_PREFIX))
                .map(|(_, v)| v.as_str()),
        ))
    }

    /// Validate one submission, appending a rejection message to `errors` on a
    /// spam decision. An inaccessible or empty field set leaves `errors`
    /// untouched.
    pub async fn screen(
        shield: &SpamShield,
        config: &ShieldConfig,
        submission: &PrefixedFormSubmission,
        meta: &RequestMeta,
        mut errors: Vec<String>,
    ) -> Vec<String> {
        let content = match Self::extract_text(submission) {
            Some(c) if !c.is_empty() => c,
            // Accessor unavailable or nothing to check: skip silently.
            _ => return errors,
        };

        let result = shield.check(config, &content, CheckKind::Email, meta).await;
        if result.is_spam {
            errors.push(SPAM_REJECTION_MESSAGE.to_string());
        }
        errors
    }
}
