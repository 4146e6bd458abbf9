// tests/adapters_fail_open.rs
//
// Adapter-level behavior against the shared pipeline:
// - every adapter treats a classifier failure as not-spam (fail open),
// - the client is invoked at most once per submission,
// - trust bypass / prior-flag short-circuits skip the client entirely.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ai_spam_shield::adapters::comment::{CommentAdapter, CommentStatus, CommentSubmission};
use ai_spam_shield::adapters::keyed_form::{KeyedEntry, KeyedFormAdapter};
use ai_spam_shield::adapters::labeled_form::{LabeledEntry, LabeledFormAdapter};
use ai_spam_shield::adapters::prefixed_form::{
    PrefixedFormAdapter, PrefixedFormSubmission, SPAM_REJECTION_MESSAGE,
};
use ai_spam_shield::adapters::simple_form::{SimpleFormAdapter, SimpleFormSubmission};
use ai_spam_shield::client::{MockSpamClient, SpamClient};
use ai_spam_shield::engine::{RequestMeta, SpamShield};
use ai_spam_shield::log::CheckLog;
use ai_spam_shield::verdict::Verdict;
use ai_spam_shield::ShieldConfig;

/// Wraps any client and counts how many times the wire is actually hit.
struct CountingClient<C> {
    inner: C,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl<C: SpamClient> SpamClient for CountingClient<C> {
    async fn classify(&self, content: &str) -> Verdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(content).await
    }
    fn name(&self) -> &'static str {
        "counting"
    }
}

fn counted_shield(inner: MockSpamClient) -> (SpamShield, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let client = CountingClient {
        inner,
        calls: Arc::clone(&calls),
    };
    let shield = SpamShield::new(Arc::new(client), Arc::new(CheckLog::new()));
    (shield, calls)
}

fn failing_shield() -> (SpamShield, Arc<AtomicUsize>) {
    counted_shield(MockSpamClient::failing("connection refused"))
}

#[tokio::test]
async fn comment_fails_open_on_classifier_error() {
    let (shield, calls) = failing_shield();
    let cfg = ShieldConfig::default();
    let sub = CommentSubmission::new("Buy cheap pills now!!!");
    let out = CommentAdapter::screen(&shield, &cfg, sub, &RequestMeta::default()).await;
    assert_eq!(out.status, CommentStatus::Pending, "fail open, not spam");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(shield.log().is_empty(), "error paths never log");
}

#[tokio::test]
async fn comment_spam_decision_rejects_instead_of_deleting() {
    let (shield, calls) = counted_shield(MockSpamClient::spam(0.92));
    let cfg = ShieldConfig::default();
    let mut sub = CommentSubmission::new("Buy cheap pills now!!!");
    sub.author_email = "spam@bot.example".into();
    let out = CommentAdapter::screen(&shield, &cfg, sub, &RequestMeta::default()).await;
    assert_eq!(out.status, CommentStatus::Spam);
    assert_eq!(out.content, "Buy cheap pills now!!!", "content untouched");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn moderator_comments_bypass_the_check() {
    let (shield, calls) = counted_shield(MockSpamClient::spam(0.99));
    let cfg = ShieldConfig::default();
    let mut sub = CommentSubmission::new("totally fine");
    sub.author_can_moderate = true;
    let out = CommentAdapter::screen(&shield, &cfg, sub, &RequestMeta::default()).await;
    assert_eq!(out.status, CommentStatus::Pending);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "trusted authors skip the wire");
}

#[tokio::test]
async fn simple_form_fails_open_on_classifier_error() {
    let (shield, calls) = failing_shield();
    let cfg = ShieldConfig::default();
    let sub = SimpleFormSubmission::with_text_fields([("msg", "Buy cheap pills now!!!")]);
    let spam = SimpleFormAdapter::screen(&shield, &cfg, &sub, &RequestMeta::default()).await;
    assert!(!spam);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn simple_form_keeps_prior_spam_flag_without_calling() {
    let (shield, calls) = counted_shield(MockSpamClient::legitimate(0.1));
    let cfg = ShieldConfig::default();
    let mut sub = SimpleFormSubmission::with_text_fields([("msg", "hello")]);
    sub.already_flagged = true;
    let spam = SimpleFormAdapter::screen(&shield, &cfg, &sub, &RequestMeta::default()).await;
    assert!(spam, "an existing determination is never overridden");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn keyed_form_fails_open_on_classifier_error() {
    let (shield, calls) = failing_shield();
    let cfg = ShieldConfig::default();
    let entry = KeyedEntry::from_pairs([("1", "Buy cheap pills now!!!")]);
    let spam = KeyedFormAdapter::screen(&shield, &cfg, &entry, &RequestMeta::default()).await;
    assert!(!spam);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn keyed_form_flags_confident_spam() {
    let (shield, _) = counted_shield(MockSpamClient::spam(0.92));
    let cfg = ShieldConfig::default();
    let entry = KeyedEntry::from_pairs([("1", "Buy cheap pills now!!!"), ("source_url", "x")]);
    let spam = KeyedFormAdapter::screen(&shield, &cfg, &entry, &RequestMeta::default()).await;
    assert!(spam);
}

#[tokio::test]
async fn prefixed_form_skips_silently_when_fields_are_inaccessible() {
    let (shield, calls) = counted_shield(MockSpamClient::spam(0.99));
    let cfg = ShieldConfig::default();
    let errors = PrefixedFormAdapter::screen(
        &shield,
        &cfg,
        &PrefixedFormSubmission::opaque(),
        &RequestMeta::default(),
        Vec::new(),
    )
    .await;
    assert!(errors.is_empty(), "no accessor -> no check, no error");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn prefixed_form_appends_rejection_on_spam() {
    let (shield, _) = counted_shield(MockSpamClient::spam(0.92));
    let cfg = ShieldConfig::default();
    let sub = PrefixedFormSubmission::from_pairs([
        ("form-field-message", "Buy cheap pills now!!!"),
        ("formId", "3"),
    ]);
    let errors =
        PrefixedFormAdapter::screen(&shield, &cfg, &sub, &RequestMeta::default(), Vec::new()).await;
    assert_eq!(errors, vec![SPAM_REJECTION_MESSAGE.to_string()]);
}

#[tokio::test]
async fn prefixed_form_fails_open_on_classifier_error() {
    let (shield, _) = failing_shield();
    let cfg = ShieldConfig::default();
    let sub = PrefixedFormSubmission::from_pairs([("form-field-message", "spammy")]);
    let errors =
        PrefixedFormAdapter::screen(&shield, &cfg, &sub, &RequestMeta::default(), Vec::new()).await;
    assert!(errors.is_empty());
}

#[tokio::test]
async fn labeled_form_attaches_error_to_contributing_field() {
    let (shield, _) = counted_shield(MockSpamClient::spam(0.92));
    let cfg = ShieldConfig::default();
    let entry = LabeledEntry::from_fields([("name", ""), ("message", "Buy cheap pills now!!!")]);
    let out = LabeledFormAdapter::screen(&shield, &cfg, entry, &RequestMeta::default()).await;
    assert!(out.has_errors());
    assert!(out.fields[0].error.is_none(), "empty field stays clean");
    assert!(out.fields[1].error.is_some(), "content field carries the message");
}

#[tokio::test]
async fn labeled_form_fails_open_on_classifier_error() {
    let (shield, calls) = failing_shield();
    let cfg = ShieldConfig::default();
    let entry = LabeledEntry::from_fields([("message", "Buy cheap pills now!!!")]);
    let out = LabeledFormAdapter::screen(&shield, &cfg, entry, &RequestMeta::default()).await;
    assert!(!out.has_errors());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_submission_never_reaches_the_wire() {
    let (shield, calls) = counted_shield(MockSpamClient::spam(0.99));
    let cfg = ShieldConfig::default();
    let sub = SimpleFormSubmission::default();
    let spam = SimpleFormAdapter::screen(&shield, &cfg, &sub, &RequestMeta::default()).await;
    assert!(!spam);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "empty blob short-circuits");
    assert!(shield.log().is_empty());
}
