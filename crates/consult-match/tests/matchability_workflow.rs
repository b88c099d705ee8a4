//! Integration tests for matchability prediction, ranking and skill alerts.
//!
//! Scenarios go through the public service facade and HTTP router, backed by the CSV directory,
//! so the wire format and directory contract are covered without reaching into private modules.

mod common {
    use std::io::Cursor;
    use std::sync::Arc;

    use consult_match::workflows::matchability::{
        ChangeFeed, CsvConsultantDirectory, FeedNotificationPublisher, MatchabilityService,
        MatchingConfig,
    };

    pub(super) const EXPORT: &str = "id,name,skills,availability,location,hourly_rate,email,alert_skills\n\
c-ada,Ada,React;TypeScript;Node,Available,Stockholm,900,ada@example.com,React\n\
c-bo,Bo,React;Redux,Available,Malmö,,bo@example.com,\n\
c-cy,Cy,Java;Spring,Available,Uppsala,700,,Kotlin;Java\n\
c-di,Di,React;TypeScript,Busy,Lund,850,di@example.com,TypeScript\n";

    pub(super) type Service = MatchabilityService<CsvConsultantDirectory, FeedNotificationPublisher>;

    pub(super) fn build_service() -> (Service, ChangeFeed) {
        let directory =
            CsvConsultantDirectory::from_reader(Cursor::new(EXPORT)).expect("export parses");
        let feed = ChangeFeed::default();
        let service = MatchabilityService::new(
            Arc::new(directory),
            Arc::new(FeedNotificationPublisher::new(feed.clone())),
            MatchingConfig::default(),
        );
        (service, feed)
    }
}

mod prediction {
    use super::common::*;
    use consult_match::workflows::matchability::{
        AssignmentCriteria, AssignmentPayload, MatchQuality,
    };

    #[test]
    fn predicts_from_wire_payload() {
        let (service, _) = build_service();
        let payload: AssignmentPayload = serde_json::from_str(
            r#"{"requiredSkills":["React","TypeScript"],"budgetMin":800,"budgetMax":1000}"#,
        )
        .expect("payload parses");

        let report = service
            .predict(&AssignmentCriteria::from(payload))
            .expect("prediction succeeds");

        // Ada covers both skills at 900; Bo covers half at the default 800 rate.
        assert_eq!(report.available_candidates, 2);
        assert_eq!(report.total_score, round_score(0.4 * 0.75 + 0.3 + 0.3 * 0.2));
        assert_eq!(report.match_quality, MatchQuality::Medium);
        assert_eq!(report.insights.len(), 1);
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let (service, _) = build_service();
        let criteria = AssignmentCriteria::new(["Java"]).with_budget(0.0, Some(1000.0));

        let first = service.predict(&criteria).expect("first prediction");
        let second = service.predict(&criteria).expect("second prediction");
        assert_eq!(first, second);
    }

    fn round_score(raw: f64) -> u8 {
        (raw * 100.0).round() as u8
    }
}

mod alerts {
    use super::common::*;
    use consult_match::workflows::matchability::{consultant_topic, AssignmentCriteria, ConsultantId};

    #[test]
    fn alerts_reach_subscribed_consultants_including_busy_ones() {
        let (service, feed) = build_service();
        let mut ada = feed.subscribe(consultant_topic(&ConsultantId("c-ada".to_string())));
        let mut di = feed.subscribe(consultant_topic(&ConsultantId("c-di".to_string())));

        let dispatch = service
            .dispatch_skill_alerts(
                "a-100",
                Some("Frontend lead"),
                &AssignmentCriteria::new(["React", "TypeScript"]),
            )
            .expect("dispatch succeeds");

        let ids: Vec<_> = dispatch.notified.iter().map(|id| id.0.as_str()).collect();
        assert_eq!(ids, vec!["c-ada", "c-di"]);
        assert!(ada.try_recv().is_some());
        assert!(di.try_recv().is_some());
    }
}

mod routing {
    use super::common::*;
    use consult_match::workflows::matchability::matchability_router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn predict_endpoint_matches_documented_shape() {
        let (service, _) = build_service();
        let router = matchability_router(Arc::new(service));

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/matchability/predict")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        json!({ "assignmentData": { "requiredSkills": ["Java"] } }).to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body: Value = serde_json::from_slice(&body).expect("json payload");

        assert_eq!(body["success"], json!(true));
        let prediction = &body["prediction"];
        for key in [
            "totalScore",
            "availableCandidates",
            "matchQuality",
            "insights",
            "recommendations",
        ] {
            assert!(prediction.get(key).is_some(), "missing {key}");
        }
        assert_eq!(prediction["availableCandidates"], json!(1));
    }
}
