use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::matchability::alerts::SkillAlertNotice;
use crate::workflows::matchability::domain::{
    AssignmentCriteria, Availability, ConsultantId, ConsultantRecord, SkillAlert,
};
use crate::workflows::matchability::evaluation::{MatchabilityEngine, MatchingConfig};
use crate::workflows::matchability::repository::{
    ConsultantDirectory, NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::matchability::MatchabilityService;

pub(super) fn consultant(id: &str, skills: &[&str], hourly_rate: Option<f64>) -> ConsultantRecord {
    ConsultantRecord {
        id: ConsultantId(id.to_string()),
        name: Some(format!("Consultant {id}")),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        hourly_rate,
        availability: Availability::Available,
        location: Some("Stockholm".to_string()),
        email: Some(format!("{id}@example.com")),
    }
}

pub(super) fn busy(mut record: ConsultantRecord) -> ConsultantRecord {
    record.availability = Availability::Busy;
    record
}

pub(super) fn alert(id: &str, skills: &[&str]) -> SkillAlert {
    SkillAlert {
        consultant_id: ConsultantId(id.to_string()),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        email: Some(format!("{id}@example.com")),
        active: true,
    }
}

/// `["React","TypeScript"]`, budget 800 to 1000.
pub(super) fn frontend_criteria() -> AssignmentCriteria {
    AssignmentCriteria::new(["React", "TypeScript"]).with_budget(800.0, Some(1000.0))
}

pub(super) fn frontend_consultant() -> ConsultantRecord {
    consultant("c-react", &["react", "typescript", "node"], Some(900.0))
}

pub(super) fn engine() -> MatchabilityEngine {
    MatchabilityEngine::new(MatchingConfig::default())
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    consultants: Arc<Mutex<Vec<ConsultantRecord>>>,
    alerts: Arc<Mutex<Vec<SkillAlert>>>,
}

impl MemoryDirectory {
    pub(super) fn with(consultants: Vec<ConsultantRecord>, alerts: Vec<SkillAlert>) -> Self {
        Self {
            consultants: Arc::new(Mutex::new(consultants)),
            alerts: Arc::new(Mutex::new(alerts)),
        }
    }
}

impl ConsultantDirectory for MemoryDirectory {
    fn available_consultants(&self) -> Result<Vec<ConsultantRecord>, RepositoryError> {
        let guard = self.consultants.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|consultant| consultant.availability.is_available())
            .cloned()
            .collect())
    }

    fn skill_alerts(&self) -> Result<Vec<SkillAlert>, RepositoryError> {
        Ok(self.alerts.lock().expect("directory mutex poisoned").clone())
    }
}

pub(super) struct UnavailableDirectory;

impl ConsultantDirectory for UnavailableDirectory {
    fn available_consultants(&self) -> Result<Vec<ConsultantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn skill_alerts(&self) -> Result<Vec<SkillAlert>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<SkillAlertNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<SkillAlertNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: SkillAlertNotice) -> Result<(), NotificationError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notice: SkillAlertNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay down".to_string()))
    }
}

/// Delivers every notice except the `fail_on`-th (1-based) publish call.
#[derive(Default)]
pub(super) struct FlakyNotifier {
    fail_on: usize,
    calls: Mutex<usize>,
    delivered: Mutex<Vec<SkillAlertNotice>>,
}

impl FlakyNotifier {
    pub(super) fn failing_on(fail_on: usize) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    pub(super) fn delivered(&self) -> Vec<SkillAlertNotice> {
        self.delivered.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for FlakyNotifier {
    fn publish(&self, notice: SkillAlertNotice) -> Result<(), NotificationError> {
        let mut calls = self.calls.lock().expect("notifier mutex poisoned");
        *calls += 1;
        if *calls == self.fail_on {
            return Err(NotificationError::Transport("smtp relay down".to_string()));
        }
        self.delivered
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) fn build_service(
    consultants: Vec<ConsultantRecord>,
    alerts: Vec<SkillAlert>,
) -> (
    MatchabilityService<MemoryDirectory, MemoryNotifier>,
    Arc<MemoryNotifier>,
) {
    let directory = Arc::new(MemoryDirectory::with(consultants, alerts));
    let notifier = Arc::new(MemoryNotifier::default());
    let service =
        MatchabilityService::new(directory, notifier.clone(), MatchingConfig::default());
    (service, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
