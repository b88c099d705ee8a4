use super::super::evaluation::MatchQuality;
use serde::{Deserialize, Serialize};

/// Scored, bucketed and annotated result of one matchability prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchabilityReport {
    pub total_score: u8,
    pub available_candidates: usize,
    pub match_quality: MatchQuality,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}
