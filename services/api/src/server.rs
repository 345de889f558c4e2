use crate::cli::ServeArgs;
use crate::infra::{catalog_service, AppState, InMemorySessionRepository};
use crate::routes::with_admission_routes;
use admission_form::admission::AdmissionService;
use admission_form::catalog::option_sets;
use admission_form::config::AppConfig;
use admission_form::error::AppError;
use admission_form::telemetry;
use admission_form::FieldValidator;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let catalogs = Arc::new(catalog_service(&config.catalog)?);
    let options = option_sets(&catalogs).await;
    info!(option_sets = options.len(), "select field options loaded");

    let validator = FieldValidator::new(config.validation.clone()).with_options(options);
    let repository = Arc::new(InMemorySessionRepository::default());
    let admission_service = Arc::new(AdmissionService::new(repository, validator));

    let app = with_admission_routes(admission_service, catalogs)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        minimum_age = config.validation.minimum_age,
        "admission form service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
