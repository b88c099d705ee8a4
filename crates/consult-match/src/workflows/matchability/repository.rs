use super::alerts::SkillAlertNotice;
use super::domain::{ConsultantRecord, SkillAlert};

/// Read access to the consultant store so the service can be exercised in isolation.
pub trait ConsultantDirectory: Send + Sync {
    /// Consultants whose availability is `Available`.
    fn available_consultants(&self) -> Result<Vec<ConsultantRecord>, RepositoryError>;
    fn skill_alerts(&self) -> Result<Vec<SkillAlert>, RepositoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("consultant directory unavailable: {0}")]
    Unavailable(String),
    #[error("consultant query failed: {0}")]
    Query(String),
}

/// Outbound hook for skill-alert notices (e-mail sender, in-app feed).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: SkillAlertNotice) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
