//! HTTP API for slash commands.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use slash_commands::{CommandRegistry, Dispatcher};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state. Everything in here is read-only.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CommandRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: CommandRegistry, dispatcher: Dispatcher) -> Self {
        Self {
            registry: Arc::new(registry),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Create the API router without rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::permissive())
}

/// Create the API router with a global rate limit on command requests.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let commands = Router::new()
        .route("/commands/:name", post(handlers::dispatch_command))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(handlers::health))
        .merge(commands)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
