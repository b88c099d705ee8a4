use super::super::domain::AssignmentCriteria;
use super::config::SkillMatchStrategy;
use serde::Serialize;

/// Per-consultant breakdown of which required skills were covered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub ratio: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Fraction of required skills covered by the consultant; 0 when nothing is required.
pub fn skill_match_ratio<R, C>(required: &[R], consultant: &[C], strategy: SkillMatchStrategy) -> f64
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    match_details(required, consultant, strategy).ratio
}

pub fn match_details<R, C>(
    required: &[R],
    consultant: &[C],
    strategy: SkillMatchStrategy,
) -> SkillMatch
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    let candidate: Vec<NormalizedSkill> = consultant
        .iter()
        .filter_map(|skill| NormalizedSkill::new(skill.as_ref()))
        .collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for skill in required {
        let raw = skill.as_ref().trim();
        let Some(wanted) = NormalizedSkill::new(raw) else {
            continue;
        };

        if candidate.iter().any(|have| wanted.matches(have, strategy)) {
            matched.push(raw.to_string());
        } else {
            missing.push(raw.to_string());
        }
    }

    let total = matched.len() + missing.len();
    let ratio = if total == 0 {
        0.0
    } else {
        matched.len() as f64 / total as f64
    };

    SkillMatch {
        ratio,
        matched,
        missing,
    }
}

/// True when the rate (or `default_rate` if absent) lies inside the assignment budget.
pub fn within_budget(rate: Option<f64>, criteria: &AssignmentCriteria, default_rate: f64) -> bool {
    let rate = rate.filter(|rate| rate.is_finite()).unwrap_or(default_rate);
    let max = criteria.budget_max.unwrap_or(f64::INFINITY);
    criteria.budget_min <= rate && rate <= max
}

struct NormalizedSkill {
    lowered: String,
    canonical: String,
}

impl NormalizedSkill {
    fn new(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        let canonical = canonicalize(&lowered);
        Some(Self { lowered, canonical })
    }

    fn matches(&self, other: &NormalizedSkill, strategy: SkillMatchStrategy) -> bool {
        match strategy {
            SkillMatchStrategy::Substring => {
                self.lowered.contains(&other.lowered) || other.lowered.contains(&self.lowered)
            }
            SkillMatchStrategy::Token => {
                if self.canonical.is_empty() || other.canonical.is_empty() {
                    return false;
                }
                self.canonical == other.canonical
                    || has_word(&other.canonical, &self.canonical)
                    || has_word(&self.canonical, &other.canonical)
            }
        }
    }
}

fn has_word(haystack: &str, word: &str) -> bool {
    haystack.split(' ').any(|candidate| candidate == word)
}

fn canonicalize(lowered: &str) -> String {
    let stripped = if let Some(base) = lowered.strip_suffix(".js") {
        base
    } else if lowered.len() > 4 && !lowered.contains(' ') {
        lowered.strip_suffix("js").unwrap_or(lowered)
    } else {
        lowered
    };

    let spaced: String = stripped
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '+' || ch == '#' {
                ch
            } else {
                ' '
            }
        })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
