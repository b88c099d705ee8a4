use super::config::QualityThresholds;
use serde::{Deserialize, Serialize};

/// Qualitative bucket for a pool score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchQuality {
    Low,
    Medium,
    High,
}

impl MatchQuality {
    pub fn from_score(score: u8, thresholds: &QualityThresholds) -> Self {
        if score >= thresholds.high {
            Self::High
        } else if score >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}
