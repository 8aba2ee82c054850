use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRubricRepository};
use crate::routes::with_rubric_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_rubric::config::AppConfig;
use talent_rubric::error::AppError;
use talent_rubric::rubric::RubricService;
use talent_rubric::telemetry;
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

    let repository = Arc::new(InMemoryRubricRepository::default());
    let rubric_service = Arc::new(RubricService::new(repository, config.rubric));

    let app = with_rubric_routes(rubric_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_threshold = config.rubric.default_threshold_score,
        "rubric service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
