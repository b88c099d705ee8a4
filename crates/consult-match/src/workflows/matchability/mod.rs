//! Matchability scoring for posted assignments.
//!
//! The service reads available consultants from a [`ConsultantDirectory`], scores the pool
//! against an assignment's criteria and returns a [`MatchabilityReport`]. Consultant ranking and
//! skill-alert dispatch reuse the same matcher and budget filter.

pub mod alerts;
pub mod domain;
pub(crate) mod evaluation;
pub mod feed;
pub mod import;
pub mod ranking;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use alerts::{consultant_topic, FeedNotificationPublisher, SkillAlertNotice};
pub use domain::{
    AssignmentCriteria, AssignmentPayload, Availability, ConsultantId, ConsultantRecord,
    ConsultantRow, SkillAlert,
};
pub use evaluation::{
    match_details, skill_match_ratio, within_budget, InsightThresholds, MatchingConfig,
    QualityThresholds, ScoreWeights, SkillMatch, SkillMatchStrategy,
};
pub use feed::{ChangeFeed, FeedEvent, Subscription, SubscriptionId};
pub use import::{ConsultantImportError, CsvConsultantDirectory};
pub use ranking::ConsultantMatch;
pub use report::{MatchQuality, MatchabilityReport};
pub use repository::{
    ConsultantDirectory, NotificationError, NotificationPublisher, RepositoryError,
};
pub use router::{
    matchability_router, MatchesRequest, MatchesResponse, PredictRequest, PredictResponse,
    SkillAlertRequest, SkillAlertResponse,
};
pub use service::{AlertDispatch, AlertFailure, MatchabilityService, ServiceError};
