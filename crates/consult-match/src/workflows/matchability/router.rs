use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{
    lenient_count, lenient_payload, lenient_string, AssignmentCriteria, AssignmentPayload,
    ConsultantId,
};
use super::ranking::ConsultantMatch;
use super::report::MatchabilityReport;
use super::repository::{ConsultantDirectory, NotificationPublisher};
use super::service::{MatchabilityService, ServiceError};

/// Body of the prediction and ranking endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(default, deserialize_with = "lenient_payload")]
    pub assignment_data: AssignmentPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<MatchabilityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesRequest {
    #[serde(default, deserialize_with = "lenient_payload")]
    pub assignment_data: AssignmentPayload,
    #[serde(default, deserialize_with = "lenient_count")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub success: bool,
    #[serde(default)]
    pub matches: Vec<ConsultantMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAlertRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub assignment_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub assignment_data: AssignmentPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAlertResponse {
    pub success: bool,
    pub notified: usize,
    #[serde(default)]
    pub consultant_ids: Vec<ConsultantId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_consultant_ids: Vec<ConsultantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Router builder exposing the matchability endpoints.
pub fn matchability_router<D, N>(service: Arc<MatchabilityService<D, N>>) -> Router
where
    D: ConsultantDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/matchability/predict",
            post(predict_handler::<D, N>),
        )
        .route(
            "/api/v1/matchability/matches",
            post(matches_handler::<D, N>),
        )
        .route(
            "/api/v1/skill-alerts/check",
            post(skill_alert_handler::<D, N>),
        )
        .with_state(service)
}

pub(crate) async fn predict_handler<D, N>(
    State(service): State<Arc<MatchabilityService<D, N>>>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Response
where
    D: ConsultantDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(PredictResponse {
                    success: false,
                    prediction: None,
                    error: Some(rejection.body_text()),
                }),
            )
                .into_response()
        }
    };
    let criteria = AssignmentCriteria::from(request.assignment_data);
    match service.predict(&criteria) {
        Ok(report) => (
            StatusCode::OK,
            Json(PredictResponse {
                success: true,
                prediction: Some(report),
                error: None,
            }),
        )
            .into_response(),
        Err(err) => (
            error_status(&err),
            Json(PredictResponse {
                success: false,
                prediction: None,
                error: Some(err.to_string()),
            }),
        )
            .into_response(),
    }
}

pub(crate) async fn matches_handler<D, N>(
    State(service): State<Arc<MatchabilityService<D, N>>>,
    request: Result<Json<MatchesRequest>, JsonRejection>,
) -> Response
where
    D: ConsultantDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(MatchesResponse {
                    success: false,
                    matches: Vec::new(),
                    error: Some(rejection.body_text()),
                }),
            )
                .into_response()
        }
    };
    let criteria = AssignmentCriteria::from(request.assignment_data);
    match service.rank(&criteria, request.limit) {
        Ok(matches) => (
            StatusCode::OK,
            Json(MatchesResponse {
                success: true,
                matches,
                error: None,
            }),
        )
            .into_response(),
        Err(err) => (
            error_status(&err),
            Json(MatchesResponse {
                success: false,
                matches: Vec::new(),
                error: Some(err.to_string()),
            }),
        )
            .into_response(),
    }
}

pub(crate) async fn skill_alert_handler<D, N>(
    State(service): State<Arc<MatchabilityService<D, N>>>,
    request: Result<Json<SkillAlertRequest>, JsonRejection>,
) -> Response
where
    D: ConsultantDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return alert_failure_response(rejection.status(), rejection.body_text());
        }
    };
    let Some(assignment_id) = request
        .assignment_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        return alert_failure_response(
            StatusCode::BAD_REQUEST,
            "assignmentId is required to dispatch skill alerts".to_string(),
        );
    };

    let title = request.assignment_data.title.clone();
    let criteria = AssignmentCriteria::from(request.assignment_data);
    match service.dispatch_skill_alerts(&assignment_id, title.as_deref(), &criteria) {
        Ok(dispatch) if dispatch.is_complete() => (
            StatusCode::OK,
            Json(SkillAlertResponse {
                success: true,
                notified: dispatch.notified.len(),
                consultant_ids: dispatch.notified,
                failed_consultant_ids: Vec::new(),
                error: None,
            }),
        )
            .into_response(),
        Ok(dispatch) => {
            let cause = dispatch
                .failed
                .first()
                .map(|failure| failure.error.as_str())
                .unwrap_or_default();
            let error = format!(
                "skill alerts not delivered to {} consultant(s): {cause}",
                dispatch.failed.len()
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(SkillAlertResponse {
                    success: false,
                    notified: dispatch.notified.len(),
                    consultant_ids: dispatch.notified,
                    failed_consultant_ids: dispatch
                        .failed
                        .into_iter()
                        .map(|failure| failure.consultant_id)
                        .collect(),
                    error: Some(error),
                }),
            )
                .into_response()
        }
        Err(err) => alert_failure_response(error_status(&err), err.to_string()),
    }
}

fn alert_failure_response(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(SkillAlertResponse {
            success: false,
            notified: 0,
            consultant_ids: Vec::new(),
            failed_consultant_ids: Vec::new(),
            error: Some(error),
        }),
    )
        .into_response()
}

fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
