use crate::cli::ServeArgs;
use crate::infra::{in_memory_portal, AppState};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_portal::config::AppConfig;
use campus_portal::error::AppError;
use campus_portal::portal::TracingMailer;
use campus_portal::telemetry;
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
    if args.seed_demo {
        config.seed_demo = true;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portal = in_memory_portal(Arc::new(TracingMailer), &config.mail);
    if config.seed_demo {
        let summary = portal.seed_demo()?;
        info!(
            placements = summary.placements,
            events = summary.events,
            "demo data loaded"
        );
    }

    let app = with_portal_routes(portal)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, mail_from = %config.mail.from_address, "campus portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
