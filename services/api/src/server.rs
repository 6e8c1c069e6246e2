use crate::cli::ServeArgs;
use crate::infra::{self, AppState, UnconfiguredGeocoder, UnconfiguredRoutePlanner};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_compass::config::AppConfig;
use care_compass::error::AppError;
use care_compass::telemetry;
use care_compass::workflows::recommendation::{
    RankingConfig, RecommendationService, TracingSink,
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

    let facilities = Arc::new(infra::load_facilities(&config.dataset)?);
    let service = Arc::new(RecommendationService::new(
        Arc::new(UnconfiguredGeocoder),
        Arc::new(UnconfiguredRoutePlanner),
        Arc::new(TracingSink),
        RankingConfig::default(),
    ));

    let app = with_recommendation_routes(service, facilities.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        facilities = facilities.len(),
        "care compass ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
