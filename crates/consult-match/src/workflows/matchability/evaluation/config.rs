use serde::{Deserialize, Serialize};

/// Relative weight of each term in the pool score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub skills: f64,
    pub budget: f64,
    pub volume: f64,
}

impl ScoreWeights {
    /// Negative weights would break score monotonicity in the skill and budget terms.
    pub fn is_valid(&self) -> bool {
        [self.skills, self.budget, self.volume]
            .iter()
            .all(|weight| weight.is_finite() && *weight >= 0.0)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            budget: 0.3,
            volume: 0.3,
        }
    }
}

/// How a consultant skill is compared with a required skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchStrategy {
    /// Case-insensitive substring in either direction.
    #[default]
    Substring,
    /// Canonical form equality, or one skill equal to a whole word of the other.
    Token,
}

impl SkillMatchStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "token" => Some(Self::Token),
            _ => None,
        }
    }
}

/// Score cut-offs for the quality buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub high: u8,
    pub medium: u8,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            high: 75,
            medium: 50,
        }
    }
}

/// Thresholds that switch the templated insights and recommendations on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    pub skill_match_floor: f64,
    pub budget_fit_floor: f64,
    pub few_candidates: usize,
    pub many_candidates: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            skill_match_floor: 0.5,
            budget_fit_floor: 0.5,
            few_candidates: 3,
            many_candidates: 15,
        }
    }
}

/// Scoring policy shared by prediction, ranking and skill alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub weights: ScoreWeights,
    /// Minimum skill-match ratio for a consultant to count as matching.
    pub match_threshold: f64,
    /// Matching consultants needed for the full volume bonus.
    pub volume_saturation: usize,
    pub default_hourly_rate: f64,
    pub strategy: SkillMatchStrategy,
    pub quality: QualityThresholds,
    pub insights: InsightThresholds,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            match_threshold: 0.3,
            volume_saturation: 10,
            default_hourly_rate: 800.0,
            strategy: SkillMatchStrategy::Substring,
            quality: QualityThresholds::default(),
            insights: InsightThresholds::default(),
        }
    }
}
