use crate::cli::ServeArgs;
use crate::demo;
use crate::infra::{AppState, InMemoryAgentDirectory, InMemoryCaseStore, IntakeHandle};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use debtflow::config::AppConfig;
use debtflow::error::AppError;
use debtflow::telemetry;
use debtflow::workflows::allocation::{AllocationConfig, AllocationService};
use debtflow::workflows::intake::IntakeService;
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

    let store = Arc::new(InMemoryCaseStore::default());
    let directory = Arc::new(InMemoryAgentDirectory::default());
    if args.seed_demo {
        demo::seed_sample_data(&store, &directory, demo::DEFAULT_CASES, demo::DEFAULT_AGENTS)?;
    }

    let allocation_config = AllocationConfig::with_hard_capacity(config.limits.hard_capacity);
    let allocation_service = Arc::new(AllocationService::new(
        store.clone(),
        directory,
        allocation_config,
    ));
    let intake = IntakeHandle(Arc::new(IntakeService::new(store)));

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(Extension(intake))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "case allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
