mod config;
mod policy;
mod rules;

pub use config::{
    InsightThresholds, MatchingConfig, QualityThresholds, ScoreWeights, SkillMatchStrategy,
};
pub use policy::MatchQuality;
pub use rules::{match_details, skill_match_ratio, within_budget, SkillMatch};

use super::domain::{AssignmentCriteria, ConsultantRecord};

/// Aggregates over the consultants that cleared the match threshold.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PoolSignals {
    pub matching_count: usize,
    pub mean_skill_match: f64,
    pub budget_fit: f64,
    pub total_score: u8,
    pub quality: MatchQuality,
}

/// Stateless evaluator applying the matching policy to a consultant pool.
#[derive(Debug, Clone)]
pub(crate) struct MatchabilityEngine {
    config: MatchingConfig,
}

impl MatchabilityEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn score_pool(
        &self,
        criteria: &AssignmentCriteria,
        consultants: &[ConsultantRecord],
    ) -> PoolSignals {
        let mut matching_count = 0usize;
        let mut ratio_sum = 0.0;
        let mut budget_hits = 0usize;

        for consultant in consultants {
            let ratio = skill_match_ratio(
                criteria.required_skills.as_slice(),
                consultant.skills.as_slice(),
                self.config.strategy,
            );
            if ratio < self.config.match_threshold {
                continue;
            }

            matching_count += 1;
            ratio_sum += ratio;
            if within_budget(
                consultant.hourly_rate,
                criteria,
                self.config.default_hourly_rate,
            ) {
                budget_hits += 1;
            }
        }

        let (mean_skill_match, budget_fit) = if matching_count == 0 {
            (0.0, 0.0)
        } else {
            (
                ratio_sum / matching_count as f64,
                budget_hits as f64 / matching_count as f64,
            )
        };

        let total_score = self.total_score(mean_skill_match, budget_fit, matching_count);
        let quality = MatchQuality::from_score(total_score, &self.config.quality);

        PoolSignals {
            matching_count,
            mean_skill_match,
            budget_fit,
            total_score,
            quality,
        }
    }

    pub fn total_score(&self, mean_skill_match: f64, budget_fit: f64, matching_count: usize) -> u8 {
        let weights = &self.config.weights;
        let volume = if self.config.volume_saturation == 0 {
            if matching_count > 0 {
                1.0
            } else {
                0.0
            }
        } else {
            (matching_count as f64 / self.config.volume_saturation as f64).min(1.0)
        };

        let raw = weights.skills * mean_skill_match
            + weights.budget * budget_fit
            + weights.volume * volume;

        (raw * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
