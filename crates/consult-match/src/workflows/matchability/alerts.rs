use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{AssignmentCriteria, ConsultantId, SkillAlert};
use super::evaluation::{match_details, SkillMatchStrategy};
use super::feed::ChangeFeed;
use super::repository::{NotificationError, NotificationPublisher};

pub(crate) const SKILL_ALERT_KIND: &str = "skill_alert";

/// Notice sent to a consultant whose saved skills fit a newly posted assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAlertNotice {
    pub consultant_id: ConsultantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub assignment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_title: Option<String>,
    pub matched_skills: Vec<String>,
    pub issued_at: DateTime<Utc>,
}

/// Alert skills that fit the assignment; empty when the alert should stay quiet.
pub(crate) fn matched_alert_skills(
    alert: &SkillAlert,
    criteria: &AssignmentCriteria,
    strategy: SkillMatchStrategy,
) -> Vec<String> {
    if !alert.active || criteria.required_skills.is_empty() {
        return Vec::new();
    }

    match_details(
        alert.skills.as_slice(),
        criteria.required_skills.as_slice(),
        strategy,
    )
    .matched
}

pub fn consultant_topic(id: &ConsultantId) -> String {
    format!("consultant:{}", id.0)
}

/// Publishes notices onto the change feed under `consultant:{id}`.
#[derive(Debug, Clone, Default)]
pub struct FeedNotificationPublisher {
    feed: ChangeFeed,
}

impl FeedNotificationPublisher {
    pub fn new(feed: ChangeFeed) -> Self {
        Self { feed }
    }
}

impl NotificationPublisher for FeedNotificationPublisher {
    fn publish(&self, notice: SkillAlertNotice) -> Result<(), NotificationError> {
        let topic = consultant_topic(&notice.consultant_id);
        let payload = serde_json::to_value(&notice)
            .map_err(|err| NotificationError::Transport(err.to_string()))?;
        let delivered = self.feed.publish(&topic, SKILL_ALERT_KIND, payload);
        debug!(topic = %topic, delivered, "skill alert published to feed");
        Ok(())
    }
}
