//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health route and the proxy fallback
//! - Wire up middleware (request ID, tracing, access log)
//! - Bind server to listener
//! - Dispatch every other request to the proxy dispatcher

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRef, State},
    http::Request,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, GatewayConfig};
use crate::health::{health_handler, HealthResponder};
use crate::http::dispatch::Dispatcher;
use crate::http::middleware::access_log;
use crate::http::request::UuidRequestId;
use crate::lifecycle::ShutdownSignal;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub health: HealthResponder,
}

impl FromRef<AppState> for Dispatcher {
    fn from_ref(state: &AppState) -> Self {
        state.dispatcher.clone()
    }
}

impl FromRef<AppState> for HealthResponder {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    routes: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a new HTTP server. Fails on any configuration problem,
    /// including a health path the router cannot mount.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let routes = Arc::new(RouteTable::from_config(&config.routes)?);
        if routes.is_empty() {
            tracing::warn!("No routes configured; only the health endpoint will answer");
        }

        let state = AppState {
            dispatcher: Dispatcher::new(routes.clone(), &config.timeouts),
            health: HealthResponder::new(config.health.service_name.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, routes })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.health.path, get(health_handler))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn(access_log)),
            )
    }

    /// The fully layered router, e.g. for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The compiled route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

/// Fallback handler: everything that is not the health endpoint.
async fn proxy_handler(State(dispatcher): State<Dispatcher>, request: Request<Body>) -> Response {
    dispatcher.dispatch(request).await
}
