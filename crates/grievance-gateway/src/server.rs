// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the HTTP listener.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware as axum_middleware,
    routing::get,
};
use grievance_core::GrievanceError;
use grievance_ip::IpResolver;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::client_ip::capture_client_ip;
use crate::handlers;
use crate::service::GrievanceService;

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: GrievanceService,
    pub resolver: Arc<IpResolver>,
    /// Process start, for uptime reporting.
    pub started: Instant,
}

impl AppState {
    pub fn new(service: GrievanceService, resolver: IpResolver) -> Self {
        Self {
            service,
            resolver: Arc::new(resolver),
            started: Instant::now(),
        }
    }
}

/// Listener and surface options.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
    /// Built client assets. `None` serves the welcome message at `/`.
    pub static_dir: Option<PathBuf>,
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, GrievanceError> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| GrievanceError::Config(format!("invalid cors_origin `{origin}`: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

/// Build the full router. Every request passes through client IP capture.
pub fn build_router(state: AppState, options: &ServerOptions) -> Result<Router, GrievanceError> {
    let api = Router::new()
        .route(
            "/api/grievances",
            get(handlers::list_grievances).post(handlers::create_grievance),
        )
        .route("/health", get(handlers::health));

    let app = match &options.static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => api.route("/", get(handlers::welcome)),
    };

    Ok(app
        .layer(axum_middleware::from_fn_with_state(
            state.resolver.clone(),
            capture_client_ip,
        ))
        .layer(cors_layer(options.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    options: &ServerOptions,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), GrievanceError> {
    let app = build_router(state, options)?;

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GrievanceError::Transport {
            message: format!("failed to bind {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("grievance API listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| GrievanceError::Transport {
        message: format!("server error: {e}"),
        source: Some(Box::new(e)),
    })?;

    info!("grievance API stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cors_origin_is_rejected() {
        assert!(cors_layer(Some("https://ok.example.com")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
        assert!(cors_layer(None).is_ok());
    }
}
