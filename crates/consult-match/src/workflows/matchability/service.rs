use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::alerts::{matched_alert_skills, SkillAlertNotice};
use super::domain::{AssignmentCriteria, ConsultantId, ConsultantRecord};
use super::evaluation::{MatchabilityEngine, MatchingConfig};
use super::ranking::{rank_consultants, ConsultantMatch};
use super::report::{build_report, MatchabilityReport};
use super::repository::{ConsultantDirectory, NotificationPublisher, RepositoryError};

/// Service composing the consultant directory, notification hook and scoring policy.
pub struct MatchabilityService<D, N> {
    directory: Arc<D>,
    notifier: Arc<N>,
    engine: Arc<MatchabilityEngine>,
}

impl<D, N> MatchabilityService<D, N>
where
    D: ConsultantDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(directory: Arc<D>, notifier: Arc<N>, config: MatchingConfig) -> Self {
        Self {
            directory,
            notifier,
            engine: Arc::new(MatchabilityEngine::new(config)),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        self.engine.config()
    }

    /// Score the available consultant pool against the assignment criteria.
    pub fn predict(
        &self,
        criteria: &AssignmentCriteria,
    ) -> Result<MatchabilityReport, ServiceError> {
        let consultants = self.available_consultants()?;
        let report = self.evaluate_pool(criteria, &consultants);

        info!(
            required_skills = criteria.required_skills.len(),
            pool = consultants.len(),
            candidates = report.available_candidates,
            score = report.total_score,
            quality = report.match_quality.label(),
            "matchability predicted"
        );

        Ok(report)
    }

    /// Pure scoring over an already fetched pool.
    pub fn evaluate_pool(
        &self,
        criteria: &AssignmentCriteria,
        consultants: &[ConsultantRecord],
    ) -> MatchabilityReport {
        let signals = self.engine.score_pool(criteria, consultants);
        build_report(&signals, &self.engine.config().insights)
    }

    /// Rank individual consultants for the assignment, best fit first.
    pub fn rank(
        &self,
        criteria: &AssignmentCriteria,
        limit: Option<usize>,
    ) -> Result<Vec<ConsultantMatch>, ServiceError> {
        let consultants = self.available_consultants()?;
        let matches = rank_consultants(self.engine.config(), criteria, &consultants, limit);
        info!(
            pool = consultants.len(),
            matches = matches.len(),
            "consultants ranked"
        );
        Ok(matches)
    }

    /// Notify every consultant whose active skill alert fits the assignment, once each.
    ///
    /// A failed notice does not stop the dispatch; it is reported in [`AlertDispatch::failed`]
    /// next to the consultants that were reached.
    pub fn dispatch_skill_alerts(
        &self,
        assignment_id: &str,
        assignment_title: Option<&str>,
        criteria: &AssignmentCriteria,
    ) -> Result<AlertDispatch, ServiceError> {
        let alerts = self.directory.skill_alerts().map_err(|err| {
            warn!(error = %err, "skill alert lookup failed");
            err
        })?;

        let mut attempted = BTreeSet::new();
        let mut notified = Vec::new();
        let mut failed = Vec::new();
        for alert in alerts {
            if attempted.contains(&alert.consultant_id) {
                continue;
            }

            let matched_skills = matched_alert_skills(&alert, criteria, self.engine.config().strategy);
            if matched_skills.is_empty() {
                continue;
            }
            attempted.insert(alert.consultant_id.clone());

            debug!(
                consultant = %alert.consultant_id,
                matched = matched_skills.len(),
                "skill alert triggered"
            );
            let notice = SkillAlertNotice {
                consultant_id: alert.consultant_id.clone(),
                email: alert.email.clone(),
                assignment_id: assignment_id.to_string(),
                assignment_title: assignment_title.map(str::to_string),
                matched_skills,
                issued_at: Utc::now(),
            };
            match self.notifier.publish(notice) {
                Ok(()) => notified.push(alert.consultant_id),
                Err(err) => {
                    warn!(error = %err, consultant = %alert.consultant_id, "skill alert not delivered");
                    failed.push(AlertFailure {
                        consultant_id: alert.consultant_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        notified.sort();
        failed.sort_by(|left, right| left.consultant_id.cmp(&right.consultant_id));
        info!(
            assignment_id,
            notified = notified.len(),
            failed = failed.len(),
            "skill alerts dispatched"
        );

        Ok(AlertDispatch {
            assignment_id: assignment_id.to_string(),
            notified,
            failed,
        })
    }

    fn available_consultants(&self) -> Result<Vec<ConsultantRecord>, ServiceError> {
        self.directory.available_consultants().map_err(|err| {
            warn!(error = %err, "consultant lookup failed");
            ServiceError::from(err)
        })
    }
}

/// Outcome of one alert dispatch. Both lists are in id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDispatch {
    pub assignment_id: String,
    pub notified: Vec<ConsultantId>,
    pub failed: Vec<AlertFailure>,
}

impl AlertDispatch {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFailure {
    pub consultant_id: ConsultantId,
    pub error: String,
}

/// Error raised by the matchability service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Directory(#[from] RepositoryError),
}
