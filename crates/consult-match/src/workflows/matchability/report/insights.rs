use super::super::evaluation::{InsightThresholds, MatchQuality, PoolSignals};
use super::views::MatchabilityReport;

pub(crate) const NARROW_SKILLS_INSIGHT: &str =
    "Skill requirements may be too specific; few consultants cover most of the required skills.";
pub(crate) const BUDGET_INSIGHT: &str =
    "Budget range may be limiting; most matching consultants charge outside it.";
pub(crate) const FEW_CANDIDATES_INSIGHT: &str = "Too few candidates match this assignment.";

pub(crate) const REDUCE_SKILLS_RECOMMENDATION: &str =
    "Consider reducing the number of required skills.";
pub(crate) const ADJUST_BUDGET_RECOMMENDATION: &str =
    "Consider adjusting the budget range to reach more consultants.";
pub(crate) const NARROW_REQUIREMENTS_RECOMMENDATION: &str =
    "Many consultants match; consider narrowing the requirements to find the best fit.";

pub(crate) fn build_report(
    signals: &PoolSignals,
    thresholds: &InsightThresholds,
) -> MatchabilityReport {
    let mut insights = Vec::new();
    if signals.mean_skill_match < thresholds.skill_match_floor {
        insights.push(NARROW_SKILLS_INSIGHT.to_string());
    }
    if signals.budget_fit < thresholds.budget_fit_floor {
        insights.push(BUDGET_INSIGHT.to_string());
    }
    if signals.matching_count < thresholds.few_candidates {
        insights.push(FEW_CANDIDATES_INSIGHT.to_string());
    }

    let mut recommendations = Vec::new();
    if signals.quality == MatchQuality::Low {
        recommendations.push(REDUCE_SKILLS_RECOMMENDATION.to_string());
        recommendations.push(ADJUST_BUDGET_RECOMMENDATION.to_string());
    }
    if signals.matching_count > thresholds.many_candidates {
        recommendations.push(NARROW_REQUIREMENTS_RECOMMENDATION.to_string());
    }

    MatchabilityReport {
        total_score: signals.total_score,
        available_candidates: signals.matching_count,
        match_quality: signals.quality,
        insights,
        recommendations,
    }
}
