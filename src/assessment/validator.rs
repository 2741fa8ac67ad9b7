//! Advisory assessment validation
//!
//! The oracle is instructed to honor these rules in its prompt, but nothing
//! guarantees it does. Validation recomputes the domain invariants and
//! reports violations; the assessment itself is propagated unmodified.
//! Violations are surfaced as log warnings by the pipeline, not errors.

use super::{PilingLabel, Rating, VisibilityAssessment};

/// Check an assessment against the domain invariants
///
/// Returns one message per violated invariant, empty when consistent:
/// - `pilingCount` must equal the number of visible labels, with no
///   duplicates
/// - `rating` must match the fixed band for the estimated distance
/// - visibility must reach the farthest visible piling and may exceed it
///   only up to the next landmark's distance; with no pilings visible it is
///   bounded by the nearest landmark
/// - `description` is expected to be non-empty
pub fn validate(assessment: &VisibilityAssessment) -> Vec<String> {
    let mut violations = Vec::new();

    if assessment.description.trim().is_empty() {
        violations.push("description is empty".to_string());
    }

    if assessment.piling_count as usize != assessment.visible_pilings.len() {
        violations.push(format!(
            "pilingCount {} does not match {} visible labels",
            assessment.piling_count,
            assessment.visible_pilings.len()
        ));
    }

    for (i, label) in assessment.visible_pilings.iter().enumerate() {
        if assessment.visible_pilings[..i].contains(label) {
            violations.push(format!("duplicate piling label {:?}", label.as_str()));
        }
    }

    if assessment.estimated_visibility_ft < 0.0 {
        violations.push(format!(
            "estimatedVisibilityFt {} is negative",
            assessment.estimated_visibility_ft
        ));
    }

    let expected = Rating::for_distance(assessment.estimated_visibility_ft);
    if assessment.rating != expected {
        violations.push(format!(
            "rating {:?} does not match the {:?} band for {}ft",
            assessment.rating.as_str(),
            expected.as_str(),
            assessment.estimated_visibility_ft
        ));
    }

    match assessment.farthest_visible() {
        Some(farthest) => {
            if assessment.estimated_visibility_ft < farthest.distance_ft() {
                violations.push(format!(
                    "visibility {}ft is below the farthest visible piling at {}ft",
                    assessment.estimated_visibility_ft,
                    farthest.distance_ft()
                ));
            }
            if let Some(bound) = farthest.next_landmark_ft() {
                if assessment.estimated_visibility_ft > bound {
                    violations.push(format!(
                        "visibility {}ft exceeds the {}ft bound set by the next landmark beyond {:?}",
                        assessment.estimated_visibility_ft,
                        bound,
                        farthest.as_str()
                    ));
                }
            }
        }
        None => {
            let bound = PilingLabel::CloseR.distance_ft();
            if assessment.estimated_visibility_ft > bound {
                violations.push(format!(
                    "visibility {}ft with no pilings visible exceeds the nearest landmark at {}ft",
                    assessment.estimated_visibility_ft, bound
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Confidence;

    fn assessment() -> VisibilityAssessment {
        VisibilityAssessment {
            description: "Both right pilings visible, water slightly green".to_string(),
            piling_count: 2,
            visible_pilings: vec![PilingLabel::CloseR, PilingLabel::BackR],
            estimated_visibility_ft: 12.0,
            rating: Rating::Good,
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_consistent_assessment_passes() {
        assert!(validate(&assessment()).is_empty());
    }

    #[test]
    fn test_count_mismatch_flagged() {
        let mut a = assessment();
        a.piling_count = 3;
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("pilingCount")));
    }

    #[test]
    fn test_duplicate_label_flagged() {
        let mut a = assessment();
        a.visible_pilings = vec![PilingLabel::CloseR, PilingLabel::CloseR];
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("duplicate")));
    }

    #[test]
    fn test_rating_band_mismatch_flagged() {
        let mut a = assessment();
        a.rating = Rating::Excellent;
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("band")));
    }

    #[test]
    fn test_visibility_below_farthest_piling_flagged() {
        let mut a = assessment();
        // back R at 11ft claimed visible but visibility only 8ft
        a.estimated_visibility_ft = 8.0;
        a.rating = Rating::Fair;
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("below the farthest")));
    }

    #[test]
    fn test_visibility_beyond_next_landmark_flagged() {
        let mut a = assessment();
        // farthest visible is back R (11ft); next landmark is back L (14ft),
        // so 20ft is out of bounds
        a.estimated_visibility_ft = 20.0;
        a.rating = Rating::Excellent;
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("next landmark")));
    }

    #[test]
    fn test_visibility_between_farthest_and_next_landmark_allowed() {
        let mut a = assessment();
        a.estimated_visibility_ft = 13.0;
        let v = validate(&a);
        assert!(!v.iter().any(|m| m.contains("landmark")));
    }

    #[test]
    fn test_far_left_visible_is_unbounded_above() {
        let a = VisibilityAssessment {
            description: "All four pilings sharp".to_string(),
            piling_count: 4,
            visible_pilings: PilingLabel::ALL.to_vec(),
            estimated_visibility_ft: 35.0,
            rating: Rating::Excellent,
            confidence: Confidence::High,
        };
        assert!(validate(&a).is_empty());
    }

    #[test]
    fn test_no_pilings_bounded_by_nearest_landmark() {
        let a = VisibilityAssessment {
            description: "Murky, nothing visible".to_string(),
            piling_count: 0,
            visible_pilings: vec![],
            estimated_visibility_ft: 10.0,
            rating: Rating::Fair,
            confidence: Confidence::Medium,
        };
        let v = validate(&a);
        assert!(v.iter().any(|m| m.contains("no pilings visible")));
    }
}
