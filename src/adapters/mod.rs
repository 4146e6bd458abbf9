//! Source adapters: per-integration extraction and application of the shared
//! verdict pipeline. Each adapter normalizes its host's submission shape into
//! one text blob, runs at most one check per submission, and maps the decision
//! back into the host's own accept/reject contract.
//!
//! Shared invariant: any transport, protocol, or extraction failure yields a
//! not-spam outcome. The pipeline never blocks a legitimate submission because
//! the classifier is unreachable.

pub mod comment;
pub mod keyed_form;
pub mod labeled_form;
pub mod prefixed_form;
pub mod simple_form;

use serde::{Deserialize, Serialize};

use crate::config::ShieldConfig;

/// Which host submission pipelines are present in this deployment. Probed once
/// at startup; the registry activates only adapters whose host exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCapabilities {
    pub comments: bool,
    pub simple_forms: bool,
    pub keyed_forms: bool,
    pub prefixed_forms: bool,
    pub labeled_forms: bool,
}

impl HostCapabilities {
    pub fn all() -> Self {
        Self {
            comments: true,
            simple_forms: true,
            keyed_forms: true,
            prefixed_forms: true,
            labeled_forms: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    Comment,
    SimpleForm,
    KeyedForm,
    PrefixedForm,
    LabeledForm,
}

/// Explicit replacement for runtime hook registration: each variant declares
/// the host capability it needs, and activation is decided once from the
/// capability probe plus the config flags.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    active: Vec<AdapterKind>,
}

impl AdapterRegistry {
    pub fn probe(caps: &HostCapabilities, config: &ShieldConfig) -> Self {
        let mut active = Vec::new();
        if !config.enabled {
            return Self { active };
        }
        if config.check_comments && caps.comments {
            active.push(AdapterKind::Comment);
        }
        if config.check_contact_forms {
            if caps.simple_forms {
                active.push(AdapterKind::SimpleForm);
            }
            if caps.keyed_forms {
                active.push(AdapterKind::KeyedForm);
            }
            if caps.prefixed_forms {
                active.push(AdapterKind::PrefixedForm);
            }
            if caps.labeled_forms {
                active.push(AdapterKind::LabeledForm);
            }
        }
        Self { active }
    }

    pub fn is_active(&self, kind: AdapterKind) -> bool {
        self.active.contains(&kind)
    }

    pub fn active(&self) -> &[AdapterKind] {
        &self.active
    }
}

/// Join non-empty values with a trailing newline each, matching the blob shape
/// the classifier was trained on.
pub(crate) fn join_values<'a, I: IntoIterator<Item = &'a str>>(values: I) -> String {
    let mut blob = String::new();
    for v in values {
        if !v.is_empty() {
            blob.push_str(v);
            blob.push('\n');
        }
    }
    blob
}
