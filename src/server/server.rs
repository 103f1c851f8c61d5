use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::metrics::metrics_handler;
use super::programs_routes::make_programs_routes;
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    })
}

fn make_cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("Invalid CORS origin: {}", origin))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn make_app(config: ServerConfig, program_store: GuardedProgramStore) -> Result<Router> {
    let state = ServerState::new(config.clone(), program_store);

    let programs_routes = make_programs_routes(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(ref frontend_path) => {
            info!("Serving frontend from {}", frontend_path);
            let static_files_service = ServeDir::new(frontend_path);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router.merge(programs_routes);

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    if let Some(origin) = config.cors_allowed_origin.as_deref() {
        info!("Allowing cross-origin requests from {}", origin);
        app = app.layer(make_cors_layer(origin)?);
    }

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serves the API on `config.port` and the Prometheus endpoint on
/// `config.metrics_port` until either listener fails.
pub async fn run_server(config: ServerConfig, program_store: GuardedProgramStore) -> Result<()> {
    let app = make_app(config.clone(), program_store)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.metrics_port))
            .await
            .with_context(|| format!("Failed to bind metrics port {}", config.metrics_port))?;

    info!("Ready to serve at {}", listener.local_addr()?);
    info!(
        "Metrics available at {}/metrics",
        metrics_listener.local_addr()?
    );

    let main_server =
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .into_future();
    let metrics_server = axum::serve(metrics_listener, make_metrics_app()).into_future();

    tokio::select! {
        result = main_server => result.context("API server stopped")?,
        result = metrics_server => result.context("Metrics server stopped")?,
    }
    Ok(())
}
