//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the `/api` handlers
//! - Wire up middleware (request ID, tracing, CORS, body limit)
//! - Hot-swap the executor when a new config arrives
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::{CorsConfig, StormerConfig};
use crate::execute::ExecuteService;
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::resources::resource_router;
use crate::store::Stores;

/// Everything derived from the live config. Swapped wholesale on reload.
pub struct Runtime {
    pub config: StormerConfig,
    pub service: ExecuteService,
}

impl Runtime {
    pub fn build(config: StormerConfig) -> Result<Self, reqwest::Error> {
        let service = ExecuteService::new(&config.executor)?;
        Ok(Self { config, service })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ArcSwap<Runtime>>,
    pub stores: Stores,
}

/// HTTP server for the execution API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and stores.
    pub fn new(config: StormerConfig, stores: Stores) -> Result<Self, reqwest::Error> {
        let router_config = config.clone();
        let state = AppState {
            runtime: Arc::new(ArcSwap::from_pointee(Runtime::build(config)?)),
            stores,
        };
        let router = build_router(&router_config, state.clone());
        Ok(Self { router, state })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<StormerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_config(&state, config).await;
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &StormerConfig, state: AppState) -> Router {
    let api = Router::new()
        .route("/execute", post(handlers::execute))
        .route("/health", get(handlers::health))
        .route(
            "/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .with_state(state.clone())
        .merge(resource_router("/collections", state.stores.collections.clone()))
        .merge(resource_router("/environments", state.stores.environments.clone()));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
        .layer(cors_layer(&config.cors))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(set_request_id_layer())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Swap in a freshly loaded config. Listener and CORS settings only apply after a restart.
pub async fn apply_config(state: &AppState, config: StormerConfig) {
    let current = state.runtime.load_full();
    if current.config.listener != config.listener || current.config.cors != config.cors {
        tracing::warn!("Listener and CORS changes take effect after a restart");
    }

    let capacity = config.history.capacity;
    match Runtime::build(config) {
        Ok(runtime) => {
            state.stores.history.set_capacity(capacity).await;
            state.runtime.store(Arc::new(runtime));
            tracing::info!("Configuration reloaded");
        }
        Err(e) => tracing::error!(error = %e, "Failed to rebuild executor; keeping previous config"),
    }
}
