//! Decision engine
//!
//! ## Responsibilities
//!
//! - Confidence gate: low-confidence assessments never notify
//! - Threshold comparison against the configured visibility floor
//!
//! Stateless: each run decides from fresh input, with no hysteresis or
//! memory of prior runs.

use crate::assessment::{Confidence, VisibilityAssessment};

/// Outcome of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Whether subscribers should be notified
    pub notify: bool,
    /// Human-readable rationale for the log line
    pub reason: String,
}

/// Decide whether an assessment warrants notification
///
/// The confidence gate is evaluated first and short-circuits: a `low`
/// confidence assessment (night, obstruction, indeterminate scene) is not
/// trusted regardless of its numeric fields.
pub fn decide(assessment: &VisibilityAssessment, threshold_ft: f64) -> Decision {
    if assessment.confidence == Confidence::Low {
        return Decision {
            notify: false,
            reason: "low confidence, assessment not actionable".to_string(),
        };
    }

    if assessment.estimated_visibility_ft >= threshold_ft {
        Decision {
            notify: true,
            reason: format!(
                "visibility {}ft >= {}ft threshold",
                assessment.estimated_visibility_ft, threshold_ft
            ),
        }
    } else {
        Decision {
            notify: false,
            reason: format!(
                "visibility {}ft < {}ft threshold",
                assessment.estimated_visibility_ft, threshold_ft
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{PilingLabel, Rating};

    fn assessment(visibility: f64, rating: Rating, confidence: Confidence) -> VisibilityAssessment {
        VisibilityAssessment {
            description: "test frame".to_string(),
            piling_count: 2,
            visible_pilings: vec![PilingLabel::CloseR, PilingLabel::BackR],
            estimated_visibility_ft: visibility,
            rating,
            confidence,
        }
    }

    #[test]
    fn test_below_threshold_no_notify() {
        let d = decide(&assessment(12.0, Rating::Good, Confidence::High), 15.0);
        assert!(!d.notify);
        assert!(d.reason.contains("<"));
    }

    #[test]
    fn test_at_or_above_threshold_notifies() {
        let d = decide(&assessment(20.0, Rating::Excellent, Confidence::High), 15.0);
        assert!(d.notify);

        let d = decide(&assessment(15.0, Rating::Excellent, Confidence::Medium), 15.0);
        assert!(d.notify);
    }

    #[test]
    fn test_low_confidence_gates_regardless_of_value() {
        let d = decide(&assessment(25.0, Rating::Excellent, Confidence::Low), 15.0);
        assert!(!d.notify);
        assert!(d.reason.contains("confidence"));

        // Gate also holds for a zero threshold
        let d = decide(&assessment(25.0, Rating::Excellent, Confidence::Low), 0.0);
        assert!(!d.notify);
    }

    #[test]
    fn test_medium_confidence_is_actionable() {
        let d = decide(&assessment(16.0, Rating::Excellent, Confidence::Medium), 15.0);
        assert!(d.notify);
    }
}
