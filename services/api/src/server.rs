use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryOrderRepository};
use crate::routes::with_order_routes;
use athletic_labs::config::AppConfig;
use athletic_labs::error::AppError;
use athletic_labs::ordering::OrderService;
use athletic_labs::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.catalog.csv_path.as_deref())?;
    let order_service = Arc::new(OrderService::new(
        Arc::new(InMemoryOrderRepository::default()),
        catalog,
        config.pricing,
    ));

    let app = with_order_routes(order_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        tax_rate = %config.pricing.tax_rate,
        rush_threshold_hours = config.pricing.rush_threshold_hours,
        "athletic labs ordering service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
