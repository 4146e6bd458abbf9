//! Comment adapter: screens blog comments before they enter moderation.
//!
//! The blob is the comment body plus labeled author email/website lines, so
//! the classifier sees the same contact-info signals a human moderator would.
//! Spam is marked rejected rather than deleted, keeping the submission
//! recoverable from the host's spam queue.

use tracing::info;

use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::verdict::CheckKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStatus {
    /// Default: the host's normal moderation flow decides.
    Pending,
    /// Rejected as spam (not deleted).
    Spam,
}

#[derive(Debug, Clone)]
pub struct CommentSubmission {
    pub content: String,
    pub author_email: String,
    pub author_url: String,
    /// Authenticated submitter with comment-moderation privileges.
    pub author_can_moderate: bool,
    pub status: CommentStatus,
}

impl CommentSubmission {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author_email: String::new(),
            author_url: String::new(),
            author_can_moderate: false,
            status: CommentStatus::Pending,
        }
    }
}

pub struct CommentAdapter;

impl CommentAdapter {
    /// Comment body + labeled author fields, one blob.
    pub fn extract_text(submission: &CommentSubmission) -> String {
        let mut content = submission.content.clone();
        if !submission.author_email.is_empty() {
            content.push_str("\n\nEmail: ");
            content.push_str(&submission.author_email);
        }
        if !submission.author_url.is_empty() {
            content.push_str("\nWebsite: ");
            content.push_str(&submission.author_url);
        }
        content
    }

    /// Run the check and apply the decision to the submission status.
    /// Trusted moderators bypass the check entirely.
    pub async fn screen(
        shield: &SpamShield,
        config: &ShieldConfig,
        mut submission: CommentSubmission,
        meta: &RequestMeta,
    ) -> CommentSubmission {
        if submission.author_can_moderate {
            return submission;
        }

        let content = Self::extract_text(&submission);
        let result = shield
            .check(config, &content, CheckKind::Comment, meta)
            .await;

        if result.is_spam {
            submission.status = CommentStatus::Spam;
            info!(
                target: "spam_shield",
                confidence = result.confidence,
                method = result.method.as_deref().unwrap_or("n/a"),
                "comment marked as spam"
            );
        }

        submission
    }
}
