//! # Threshold Policy
//! Pure, testable logic that maps `(verdict, threshold)` → final spam decision.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: the raw verdict must say spam AND the classifier confidence must
//! reach the configured threshold (inclusive). Error verdicts are handled
//! upstream as fail-open and must not reach this function.

use crate::verdict::Verdict;

/// Final decision: `is_spam && confidence >= threshold`.
///
/// The boundary case `confidence == threshold` decides spam. Deterministic
/// given `(verdict, threshold)`; the threshold comes from the config snapshot
/// taken for the current submission, never from cached state.
pub fn decide(verdict: &Verdict, threshold: f32) -> bool {
    debug_assert!(verdict.error.is_none(), "error verdicts are fail-open upstream");
    verdict.is_spam && verdict.confidence >= threshold
}

/// Clamp into `<0.0, 1.0>`; used by config sanitization.
pub fn clamp01(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(is_spam: bool, confidence: f32) -> Verdict {
        Verdict::clean(is_spam, confidence)
    }

    #[test]
    fn spam_requires_both_flag_and_confidence() {
        assert!(decide(&verdict(true, 0.92), 0.6));
        assert!(!decide(&verdict(true, 0.4), 0.6));
        assert!(!decide(&verdict(false, 0.99), 0.6));
        assert!(!decide(&verdict(false, 0.0), 0.6));
    }

    #[test]
    fn boundary_confidence_equal_to_threshold_is_spam() {
        assert!(decide(&verdict(true, 0.6), 0.6));
        assert!(decide(&verdict(true, 1.0), 1.0));
        assert!(decide(&verdict(true, 0.0), 0.0));
    }

    #[test]
    fn sweep_over_unit_interval_matches_definition() {
        for t in 0..=10 {
            let threshold = t as f32 / 10.0;
            for c in 0..=10 {
                let confidence = c as f32 / 10.0;
                let expected = confidence >= threshold;
                assert_eq!(
                    decide(&verdict(true, confidence), threshold),
                    expected,
                    "confidence {confidence} vs threshold {threshold}"
                );
                assert!(!decide(&verdict(false, confidence), threshold));
            }
        }
    }

    #[test]
    fn clamp01_pins_out_of_range_values() {
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(0.35), 0.35);
    }
}
