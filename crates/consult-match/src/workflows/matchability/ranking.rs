use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{AssignmentCriteria, ConsultantId, ConsultantRecord};
use super::evaluation::{match_details, within_budget, MatchingConfig};

/// One consultant's fit for an assignment, as listed to the business user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantMatch {
    pub consultant_id: ConsultantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fit_score: u8,
    pub skill_match: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub hourly_rate: f64,
    pub within_budget: bool,
}

/// Consultants at or above the match threshold, best fit first.
pub(crate) fn rank_consultants(
    config: &MatchingConfig,
    criteria: &AssignmentCriteria,
    consultants: &[ConsultantRecord],
    limit: Option<usize>,
) -> Vec<ConsultantMatch> {
    let mut matches: Vec<ConsultantMatch> = consultants
        .iter()
        .filter_map(|consultant| {
            let details = match_details(
                criteria.required_skills.as_slice(),
                consultant.skills.as_slice(),
                config.strategy,
            );
            if details.ratio < config.match_threshold {
                return None;
            }

            let budget_ok = within_budget(consultant.hourly_rate, criteria, config.default_hourly_rate);
            Some(ConsultantMatch {
                consultant_id: consultant.id.clone(),
                name: consultant.name.clone(),
                fit_score: fit_score(config, details.ratio, budget_ok),
                skill_match: details.ratio,
                matched_skills: details.matched,
                missing_skills: details.missing,
                hourly_rate: consultant
                    .hourly_rate
                    .unwrap_or(config.default_hourly_rate),
                within_budget: budget_ok,
            })
        })
        .collect();

    matches.sort_by(|left, right| {
        right
            .fit_score
            .cmp(&left.fit_score)
            .then_with(|| {
                right
                    .skill_match
                    .partial_cmp(&left.skill_match)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| left.consultant_id.cmp(&right.consultant_id))
    });

    if let Some(limit) = limit {
        matches.truncate(limit);
    }
    matches
}

fn fit_score(config: &MatchingConfig, ratio: f64, budget_ok: bool) -> u8 {
    let weights = &config.weights;
    let budget = if budget_ok { 1.0 } else { 0.0 };
    let denominator = weights.skills + weights.budget;
    let raw = if denominator > 0.0 {
        (weights.skills * ratio + weights.budget * budget) / denominator
    } else {
        ratio
    };
    (raw * 100.0).round().clamp(0.0, 100.0) as u8
}
