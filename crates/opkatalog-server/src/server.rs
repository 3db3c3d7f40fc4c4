//! Router assembly and server lifecycle.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Builds the API router on the given state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/operations",
            get(handlers::list_operations).post(handlers::create_operation),
        )
        // Static segments must be registered alongside the {id} routes;
        // axum gives them priority.
        .route("/api/operations/bulk", post(handlers::bulk_import))
        .route("/api/operations/clear", delete(handlers::clear_operations))
        .route(
            "/api/operations/{id}",
            put(handlers::update_operation).delete(handlers::delete_operation),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct OpkatalogServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    state: AppState,
}

impl ServerBuilder {
    pub fn new(state: AppState) -> Self {
        Self {
            addr: AppConfig::default().addr(),
            state,
        }
    }

    pub fn with_config(mut self, cfg: &AppConfig) -> Self {
        self.addr = cfg.addr();
        self
    }

    pub fn build(self) -> OpkatalogServer {
        OpkatalogServer {
            addr: self.addr,
            app: build_app(self.state),
        }
    }
}

impl OpkatalogServer {
    /// Binds the listener and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound; this is the only
    /// fatal failure mode of the server.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
