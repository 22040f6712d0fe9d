//! Dispatch Server - Entry point.

use anyhow::Context;
use dispatch_server::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    commands::builtin_commands,
    config::{Config, LogConfig},
};
use response_client::ResponseClient;
use secrecy::ExposeSecret;
use slash_commands::{CommandRegistry, DeferredDelivery, Dispatcher};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log);

    info!("Starting slash-command dispatcher");

    // Outbound client for deferred replies
    let response_client = ResponseClient::new(config.callback.timeout)
        .context("Failed to create response client")?;
    let delivery = DeferredDelivery::new(Arc::new(response_client));
    let dispatcher = Dispatcher::new(config.slack.token.expose_secret().clone(), delivery);

    // Register commands
    let registry = CommandRegistry::new(builtin_commands(&config))
        .context("Failed to register commands")?;
    info!(
        "Registered {} commands: {}",
        registry.len(),
        registry.names().join(", ")
    );
    if !config.repos.is_empty() {
        info!("Loaded {} repository mappings", config.repos.len());
    }

    let state = AppState::new(registry, dispatcher);
    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit);

    // Bind to address
    let ip = config.server.listen_addr.parse().unwrap_or_else(|_| {
        warn!(
            "Invalid listen address {:?}, falling back to 0.0.0.0",
            config.server.listen_addr
        );
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    });
    let addr = SocketAddr::new(ip, config.server.port);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
