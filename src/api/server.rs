//! HTTP API server

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::store::{
    AgentStore, CustomerStore, MemoryAgentStore, MemoryCustomerStore, MemoryTokenStore,
    TokenStore,
};

use super::routes;

/// Application state shared across handlers.
///
/// Holds only the storage collaborators and config; the per-request
/// authentication state lives in an `AuthSession` constructed fresh by
/// each handler, never here.
pub struct AppState {
    pub config: Config,
    pub agents: Arc<dyn AgentStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub customers: Arc<dyn CustomerStore>,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server with in-memory stores
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState {
        config,
        agents: Arc::new(MemoryAgentStore::new()),
        tokens: Arc::new(MemoryTokenStore::new()),
        customers: Arc::new(MemoryCustomerStore::new()),
    });

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/login", post(routes::login))
        .route("/api/agents", post(routes::register_agent))
        .route("/api/agent", get(routes::read_agent))
        .route("/api/agent", put(routes::update_agent))
        // Customer routes
        .route("/api/customers", get(routes::list_customers))
        .route("/api/customers", post(routes::create_customer))
        .route("/api/customers/{id}", get(routes::get_customer))
        .route("/api/customers/{id}", put(routes::update_customer))
        .route("/api/customers/{id}", delete(routes::delete_customer))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
