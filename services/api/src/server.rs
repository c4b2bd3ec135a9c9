use crate::cli::ServeArgs;
use crate::infra::{
    demo_authenticator, seed_demo_users, AppState, InMemoryBlobStore, InMemoryRewardsStore,
    ADMIN_TOKEN, BUYER_TOKEN, CITIZEN_TOKEN, COLLECTOR_TOKEN,
};
use crate::routes::{with_rewards_routes, UploadState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use plastiside::config::{AppConfig, AppEnvironment};
use plastiside::error::AppError;
use plastiside::rewards::RewardsStack;
use plastiside::telemetry;
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

    let store = Arc::new(InMemoryRewardsStore::default());
    if config.environment != AppEnvironment::Production {
        seed_demo_users(&store)?;
        info!(
            citizen = CITIZEN_TOKEN,
            buyer = BUYER_TOKEN,
            collector = COLLECTOR_TOKEN,
            admin = ADMIN_TOKEN,
            "seeded demo accounts with well-known bearer tokens"
        );
    }

    let stack = Arc::new(RewardsStack::new(
        Arc::new(demo_authenticator()),
        store,
        config.rewards,
    ));
    let upload_state = UploadState {
        stack,
        blobs: Arc::new(InMemoryBlobStore::default()),
    };

    let app = with_rewards_routes(upload_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, reclaim_rejected = config.rewards.reclaim_rejected, "recycling rewards service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
