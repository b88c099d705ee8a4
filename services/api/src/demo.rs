use crate::infra::{load_directory, sample_directory, OutboxNotificationPublisher};
use chrono::Local;
use clap::Args;
use consult_match::config::AppConfig;
use consult_match::error::AppError;
use consult_match::workflows::matchability::{
    consultant_topic, AssignmentCriteria, ChangeFeed, ConsultantMatch, CsvConsultantDirectory,
    FeedNotificationPublisher, MatchabilityReport, MatchabilityService, MatchingConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

type CliService = MatchabilityService<CsvConsultantDirectory, FeedNotificationPublisher>;

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Consultant CSV export. Falls back to APP_CONSULTANTS_CSV, then the built-in sample pool.
    #[arg(long)]
    pub(crate) consultants: Option<PathBuf>,
    /// Required skill (repeat for several)
    #[arg(long = "skill")]
    pub(crate) skills: Vec<String>,
    /// Lower bound of the hourly budget
    #[arg(long, value_parser = crate::infra::parse_rate)]
    pub(crate) budget_min: Option<f64>,
    /// Upper bound of the hourly budget (unbounded when omitted)
    #[arg(long, value_parser = crate::infra::parse_rate)]
    pub(crate) budget_max: Option<f64>,
    /// Also list the best matching consultants
    #[arg(long)]
    pub(crate) top: Option<usize>,
    /// Emit the prediction as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Required skill for the demo assignment (repeat for several). Defaults to React and TypeScript.
    #[arg(long = "skill")]
    pub(crate) skills: Vec<String>,
    /// Skip the skill-alert portion of the demo.
    #[arg(long)]
    pub(crate) skip_alerts: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        consultants,
        skills,
        budget_min,
        budget_max,
        top,
        json,
    } = args;

    let config = AppConfig::load()?;
    let path = consultants.or(config.directory.consultants_csv);
    let service = build_service(load_directory(path.as_deref())?, config.matching);

    let criteria = AssignmentCriteria::new(skills).with_budget(budget_min.unwrap_or(0.0), budget_max);
    let report = service.predict(&criteria)?;
    let matches = match top {
        Some(limit) => service.rank(&criteria, Some(limit))?,
        None => Vec::new(),
    };

    if json {
        let payload = serde_json::json!({
            "prediction": report,
            "matches": matches,
        });
        let rendered = serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    render_report(&criteria, &report);
    if top.is_some() {
        render_matches(&criteria, &matches);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skills,
        skip_alerts,
    } = args;

    let skills = if skills.is_empty() {
        vec!["React".to_string(), "TypeScript".to_string()]
    } else {
        skills
    };

    println!("Consultant matchability demo (built-in sample pool)");
    let feed = ChangeFeed::default();
    let directory = Arc::new(sample_directory()?);
    let mut subscriptions: Vec<_> = directory
        .consultants()
        .iter()
        .map(|consultant| feed.subscribe(consultant_topic(&consultant.id)))
        .collect();
    let notifier = Arc::new(OutboxNotificationPublisher::new(feed));
    let service = MatchabilityService::new(directory, notifier.clone(), MatchingConfig::default());

    let criteria = AssignmentCriteria::new(skills).with_budget(800.0, Some(1000.0));
    let report = service.predict(&criteria)?;
    render_report(&criteria, &report);
    render_matches(&criteria, &service.rank(&criteria, Some(5))?);

    if skip_alerts {
        return Ok(());
    }

    let assignment_id = format!("demo-{}", Local::now().format("%Y%m%d%H%M"));
    println!("\nSkill alerts for assignment {assignment_id}");

    let alerts = service.dispatch_skill_alerts(&assignment_id, Some("Demo assignment"), &criteria)?;

    if alerts.notified.is_empty() {
        println!("- No saved alerts matched the required skills");
    }
    for notice in notifier.sent() {
        println!(
            "- {} <{}> matched {}",
            notice.consultant_id,
            notice.email.as_deref().unwrap_or("no e-mail on file"),
            notice.matched_skills.join(", ")
        );
    }
    for failure in &alerts.failed {
        println!("- {} not notified: {}", failure.consultant_id, failure.error);
    }

    let delivered = subscriptions
        .iter_mut()
        .filter_map(|subscription| subscription.try_recv())
        .count();
    println!("- {delivered} change-feed events delivered to consultant subscribers");

    Ok(())
}

fn build_service(directory: CsvConsultantDirectory, config: MatchingConfig) -> CliService {
    MatchabilityService::new(
        Arc::new(directory),
        Arc::new(FeedNotificationPublisher::new(ChangeFeed::default())),
        config,
    )
}

fn render_report(criteria: &AssignmentCriteria, report: &MatchabilityReport) {
    let budget = match criteria.budget_max {
        Some(max) => format!("{:.0}-{:.0} {}", criteria.budget_min, max, criteria.currency),
        None => format!("from {:.0} {}", criteria.budget_min, criteria.currency),
    };
    println!(
        "\nAssignment: {} | budget {}",
        if criteria.required_skills.is_empty() {
            "no required skills".to_string()
        } else {
            criteria.required_skills.join(", ")
        },
        budget
    );
    println!(
        "- Matchability score {} ({}) across {} matching consultants",
        report.total_score,
        report.match_quality.label(),
        report.available_candidates
    );
    if !report.insights.is_empty() {
        println!("Insights:");
        for insight in &report.insights {
            println!("  - {insight}");
        }
    }
    if !report.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!("  - {recommendation}");
        }
    }
}

fn render_matches(criteria: &AssignmentCriteria, matches: &[ConsultantMatch]) {
    if matches.is_empty() {
        println!("Top matches: none above the skill threshold");
        return;
    }
    println!("Top matches:");
    for candidate in matches {
        println!(
            "  - {} {}: fit {} | skills {:.0}% | rate {:.0}{}",
            candidate.consultant_id,
            candidate.name.as_deref().unwrap_or("(unnamed)"),
            candidate.fit_score,
            candidate.skill_match * 100.0,
            candidate.hourly_rate,
            budget_note(criteria, candidate)
        );
    }
}

fn budget_note(criteria: &AssignmentCriteria, candidate: &ConsultantMatch) -> &'static str {
    if candidate.within_budget {
        ""
    } else if candidate.hourly_rate < criteria.budget_min {
        " (below budget minimum)"
    } else {
        " (over budget)"
    }
}
