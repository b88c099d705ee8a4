use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState};
use crate::routes::with_matchability_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use consult_match::config::AppConfig;
use consult_match::error::AppError;
use consult_match::telemetry;
use consult_match::workflows::matchability::{
    ChangeFeed, FeedNotificationPublisher, MatchabilityService,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(load_directory(config.directory.consultants_csv.as_deref())?);
    let pool_size = directory.consultants().len();
    let notifier = Arc::new(FeedNotificationPublisher::new(ChangeFeed::default()));
    let service = Arc::new(MatchabilityService::new(
        directory,
        notifier,
        config.matching.clone(),
    ));

    let app = with_matchability_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        consultants = pool_size,
        strategy = ?config.matching.strategy,
        match_threshold = config.matching.match_threshold,
        log_format = ?config.telemetry.log_format,
        "matchability service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
