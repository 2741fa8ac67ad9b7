//! Assessment domain model
//!
//! ## Responsibilities
//!
//! - Typed assessment produced from one camera frame
//! - Piling landmarks with fixed known distances
//! - Rating bands and confidence levels
//! - Advisory validation of the oracle's domain invariants

mod validator;

pub use validator::validate;

use serde::{Deserialize, Serialize};

/// Pier piling landmarks at fixed known distances from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilingLabel {
    /// Right close piling, ~4ft
    #[serde(rename = "close R")]
    CloseR,
    /// Right back piling, ~11ft
    #[serde(rename = "back R")]
    BackR,
    /// Back left piling, ~14ft
    #[serde(rename = "back L")]
    BackL,
    /// Far left piling, ~30ft
    #[serde(rename = "far L")]
    FarL,
}

impl PilingLabel {
    /// All landmarks, ordered nearest to farthest
    pub const ALL: [PilingLabel; 4] = [
        PilingLabel::CloseR,
        PilingLabel::BackR,
        PilingLabel::BackL,
        PilingLabel::FarL,
    ];

    /// Distance from the camera in feet
    pub fn distance_ft(&self) -> f64 {
        match self {
            PilingLabel::CloseR => 4.0,
            PilingLabel::BackR => 11.0,
            PilingLabel::BackL => 14.0,
            PilingLabel::FarL => 30.0,
        }
    }

    /// Distance of the next landmark beyond this one, if any
    pub fn next_landmark_ft(&self) -> Option<f64> {
        match self {
            PilingLabel::CloseR => Some(PilingLabel::BackR.distance_ft()),
            PilingLabel::BackR => Some(PilingLabel::BackL.distance_ft()),
            PilingLabel::BackL => Some(PilingLabel::FarL.distance_ft()),
            PilingLabel::FarL => None,
        }
    }

    /// Label string as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PilingLabel::CloseR => "close R",
            PilingLabel::BackR => "back R",
            PilingLabel::BackL => "back L",
            PilingLabel::FarL => "far L",
        }
    }
}

/// Visibility rating, ascending; bands are fixed distance ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// 0-4ft
    Poor,
    /// 4-11ft
    Fair,
    /// 11-14ft
    Good,
    /// 14ft and beyond
    Excellent,
}

impl Rating {
    /// Rating band for a visibility distance in feet
    pub fn for_distance(ft: f64) -> Rating {
        if ft < 4.0 {
            Rating::Poor
        } else if ft < 11.0 {
            Rating::Fair
        } else if ft < 14.0 {
            Rating::Good
        } else {
            Rating::Excellent
        }
    }

    /// Rating string as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Poor => "poor",
            Rating::Fair => "fair",
            Rating::Good => "good",
            Rating::Excellent => "excellent",
        }
    }
}

/// Oracle self-reported confidence; `Low` means the assessment is not
/// actionable regardless of the numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Confidence string as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Structured judgment produced from one camera frame
///
/// Constructed once per run from the oracle's reply, never mutated.
/// Field names match the JSON schema the oracle is instructed to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityAssessment {
    /// Free-text summary of the observed scene
    pub description: String,
    /// Number of clearly visible pilings
    pub piling_count: u32,
    /// Which landmarks are visible
    pub visible_pilings: Vec<PilingLabel>,
    /// Estimated visibility in feet
    pub estimated_visibility_ft: f64,
    /// Rating band
    pub rating: Rating,
    /// Oracle self-reported confidence
    pub confidence: Confidence,
}

impl VisibilityAssessment {
    /// Farthest visible landmark, if any piling is visible
    pub fn farthest_visible(&self) -> Option<PilingLabel> {
        self.visible_pilings
            .iter()
            .copied()
            .max_by(|a, b| a.distance_ft().total_cmp(&b.distance_ft()))
    }

    /// Visible labels joined for message bodies, e.g. "close R, back R"
    pub fn piling_list(&self) -> String {
        self.visible_pilings
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bands() {
        assert_eq!(Rating::for_distance(0.0), Rating::Poor);
        assert_eq!(Rating::for_distance(3.9), Rating::Poor);
        assert_eq!(Rating::for_distance(4.0), Rating::Fair);
        assert_eq!(Rating::for_distance(10.9), Rating::Fair);
        assert_eq!(Rating::for_distance(11.0), Rating::Good);
        assert_eq!(Rating::for_distance(13.9), Rating::Good);
        assert_eq!(Rating::for_distance(14.0), Rating::Excellent);
        assert_eq!(Rating::for_distance(30.0), Rating::Excellent);
    }

    #[test]
    fn test_piling_distances_ascend() {
        let distances: Vec<f64> = PilingLabel::ALL.iter().map(|p| p.distance_ft()).collect();
        assert_eq!(distances, vec![4.0, 11.0, 14.0, 30.0]);
    }

    #[test]
    fn test_next_landmark_chain() {
        assert_eq!(PilingLabel::CloseR.next_landmark_ft(), Some(11.0));
        assert_eq!(PilingLabel::BackR.next_landmark_ft(), Some(14.0));
        assert_eq!(PilingLabel::BackL.next_landmark_ft(), Some(30.0));
        assert_eq!(PilingLabel::FarL.next_landmark_ft(), None);
    }

    #[test]
    fn test_label_serde_names() {
        let json = serde_json::to_string(&PilingLabel::CloseR).unwrap();
        assert_eq!(json, "\"close R\"");
        let back: PilingLabel = serde_json::from_str("\"far L\"").unwrap();
        assert_eq!(back, PilingLabel::FarL);
    }

    #[test]
    fn test_assessment_deserializes_camel_case() {
        let json = r#"{
            "description": "Two pilings visible in green water",
            "pilingCount": 2,
            "visiblePilings": ["close R", "back R"],
            "estimatedVisibilityFt": 12,
            "rating": "good",
            "confidence": "high"
        }"#;
        let a: VisibilityAssessment = serde_json::from_str(json).unwrap();
        assert_eq!(a.piling_count, 2);
        assert_eq!(a.estimated_visibility_ft, 12.0);
        assert_eq!(a.rating, Rating::Good);
        assert_eq!(a.confidence, Confidence::High);
        assert_eq!(a.farthest_visible(), Some(PilingLabel::BackR));
        assert_eq!(a.piling_list(), "close R, back R");
    }
}
