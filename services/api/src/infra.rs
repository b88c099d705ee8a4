use consult_match::error::AppError;
use consult_match::workflows::matchability::{
    ChangeFeed, CsvConsultantDirectory, FeedNotificationPublisher, NotificationError,
    NotificationPublisher, SkillAlertNotice,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Consultant pool used when no CSV export is configured.
pub(crate) const SAMPLE_CONSULTANTS: &str = "\
id,name,skills,availability,location,hourly_rate,email,alert_skills
c-001,Astrid Berg,React;TypeScript;Node.js;GraphQL,Available,Stockholm,950,astrid@example.com,React;TypeScript
c-002,Johan Lind,Java;Spring Boot;Kafka;AWS,Available,Gothenburg,1100,johan@example.com,Kafka
c-003,Sara Ek,Python;Django;PostgreSQL,Available,Malmö,,sara@example.com,Python
c-004,Erik Holm,React;Redux;CSS,Available,Uppsala,780,erik@example.com,
c-005,Maja Nord,Rust;Go;Kubernetes;Terraform,Busy,Stockholm,1300,maja@example.com,Rust
c-006,Leo Sand,TypeScript;Angular;RxJS,Available,Linköping,880,leo@example.com,TypeScript
c-007,Nora Vik,C#;.NET;Azure,Available,Örebro,1050,nora@example.com,
c-008,Ivar Dahl,Vue;TypeScript;Node.js,Unavailable,Lund,900,ivar@example.com,Vue
";

pub(crate) fn sample_directory() -> Result<CsvConsultantDirectory, AppError> {
    Ok(CsvConsultantDirectory::from_reader(Cursor::new(SAMPLE_CONSULTANTS))?)
}

pub(crate) fn load_directory(path: Option<&Path>) -> Result<CsvConsultantDirectory, AppError> {
    match path {
        Some(path) => {
            let directory = CsvConsultantDirectory::from_path(path)?;
            info!(
                path = %path.display(),
                consultants = directory.consultants().len(),
                "consultant export loaded"
            );
            Ok(directory)
        }
        None => {
            warn!("APP_CONSULTANTS_CSV not set; serving the built-in sample pool");
            sample_directory()
        }
    }
}

/// Records outbound skill-alert e-mails for the demo and mirrors them onto the change feed.
#[derive(Clone)]
pub(crate) struct OutboxNotificationPublisher {
    outbox: Arc<Mutex<Vec<SkillAlertNotice>>>,
    feed: FeedNotificationPublisher,
}

impl OutboxNotificationPublisher {
    pub(crate) fn new(feed: ChangeFeed) -> Self {
        Self {
            outbox: Arc::default(),
            feed: FeedNotificationPublisher::new(feed),
        }
    }

    pub(crate) fn sent(&self) -> Vec<SkillAlertNotice> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationPublisher for OutboxNotificationPublisher {
    fn publish(&self, notice: SkillAlertNotice) -> Result<(), NotificationError> {
        self.feed.publish(notice.clone())?;
        if let Some(email) = notice.email.as_deref() {
            info!(
                consultant = %notice.consultant_id,
                recipient = email,
                assignment_id = %notice.assignment_id,
                "skill alert e-mail queued"
            );
        }
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(crate) fn parse_rate(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("'{raw}' must be a non-negative amount"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_match::workflows::matchability::{
        consultant_topic, ConsultantDirectory, ConsultantId,
    };

    #[test]
    fn sample_pool_exposes_only_available_consultants() {
        let directory = sample_directory().expect("sample parses");
        let available = directory.available_consultants().expect("query succeeds");
        assert_eq!(directory.consultants().len(), 8);
        assert_eq!(available.len(), 6);
    }

    #[test]
    fn outbox_records_and_forwards_notices() {
        let feed = ChangeFeed::default();
        let consultant_id = ConsultantId("c-001".to_string());
        let mut subscription = feed.subscribe(consultant_topic(&consultant_id));
        let publisher = OutboxNotificationPublisher::new(feed);

        publisher
            .publish(SkillAlertNotice {
                consultant_id,
                email: Some("astrid@example.com".to_string()),
                assignment_id: "a-1".to_string(),
                assignment_title: None,
                matched_skills: vec!["React".to_string()],
                issued_at: chrono::Utc::now(),
            })
            .expect("publish succeeds");

        assert_eq!(publisher.sent().len(), 1);
        assert!(subscription.try_recv().is_some());
    }

    #[test]
    fn parse_rate_rejects_negative_and_garbage() {
        assert_eq!(parse_rate(" 950 "), Ok(950.0));
        assert!(parse_rate("-5").is_err());
        assert!(parse_rate("lots").is_err());
    }
}
