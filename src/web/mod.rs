pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod ui;

use crate::{models::ModelManager, Config, Result};
use axum::{
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
};

pub async fn serve(config: Config) -> Result<()> {
    // Startup is fatal on any missing or malformed model artifact.
    ModelManager::init(config.clone())?;

    let app = create_app(config.clone());

    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        crate::utils::error::ScreenError::Config(format!(
            "Invalid bind address {}: {}",
            config.bind_addr, e
        ))
    })?;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Routes:");
    tracing::info!("  GET      /                 - Landing page");
    tracing::info!("  GET/POST /clinical         - Clinical screening form");
    tracing::info!("  GET/POST /cd_ratio         - CD ratio from fundus image");
    tracing::info!("  GET/POST /custom_glaucoma  - Fundus glaucoma classifier");
    tracing::info!("  GET      /templates/<path> - Static template assets");
    tracing::info!("  GET      /health           - Health check");
    tracing::info!("  GET      /api/info         - Service information");

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        crate::utils::error::ScreenError::Internal(format!(
            "Failed to bind to address {}: {}",
            addr, e
        ))
    })?;

    axum::serve(listener, app).await.map_err(|e| {
        crate::utils::error::ScreenError::Internal(format!("Server failed to start: {}", e))
    })?;

    Ok(())
}

pub fn create_app(config: Config) -> Router {
    Router::new()
        .route("/", get(ui::home_page))
        .route(
            "/clinical",
            get(ui::clinical_page).post(handlers::clinical_handler),
        )
        .route(
            "/cd_ratio",
            get(ui::cd_ratio_page).post(handlers::cd_ratio_handler),
        )
        .route(
            "/custom_glaucoma",
            get(ui::custom_glaucoma_page).post(handlers::custom_glaucoma_handler),
        )
        // Raw template assets, the same directory the rendered pages ship from
        .nest_service("/templates", ServeDir::new(config.templates_dir.clone()))
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(RequestBodyLimitLayer::new(
            config.server_config.max_request_size,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server_config.request_timeout,
        )))
        .layer(CorsLayer::permissive())
        .with_state(config)
}

async fn health_handler() -> Result<Json<serde_json::Value>> {
    crate::models::health_check()?;
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

async fn info_handler(
    axum::extract::State(config): axum::extract::State<Config>,
) -> Result<Json<serde_json::Value>> {
    let stats = crate::models::get_model_stats()?;
    Ok(Json(json!({
        "service": "Glaucoma Screening Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "models": stats,
        "server": {
            "workers": config.workers,
            "dev_mode": config.dev_mode,
            "max_connections": config.server_config.max_connections,
            "max_request_size": config.server_config.max_request_size,
        },
        "routes": {
            "clinical": "/clinical",
            "cd_ratio": "/cd_ratio",
            "custom_glaucoma": "/custom_glaucoma"
        }
    })))
}
