//! Navidrome Registration Proxy - Entry point.

use navidrome_registration_proxy::{
    api::{cors_layer, create_router, AppState, RateLimitState},
    config::{Config, LogConfig, LogFormat},
    AdminAuthenticator, NavidromeClient,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log);

    info!("Starting Navidrome Registration Proxy");

    let navidrome = match NavidromeClient::new(&config.navidrome_url, config.upstream.timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Navidrome client: {}", e);
            std::process::exit(1);
        }
    };

    let authenticator = AdminAuthenticator::new(
        navidrome.clone(),
        &config.navidrome_admin_user,
        config.navidrome_admin_password.clone(),
    );

    let state = AppState::new(navidrome, authenticator);

    let rate_limit = RateLimitState::new(
        config.rate_limit.max_attempts,
        config.rate_limit.window,
        config.rate_limit.global_per_minute,
    )
    .trusting_forwarded_for(config.rate_limit.trust_forwarded_for);
    rate_limit.per_client.spawn_pruner();

    let cors = match cors_layer(&config.frontend_url) {
        Ok(c) => c,
        Err(e) => {
            error!(origin = %config.frontend_url, "Invalid FRONTEND_URL: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(state, rate_limit, cors);

    // Bind to address
    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Registration service running on port {}", config.port);
    info!("Navidrome URL: {}", config.navidrome_url);

    // Client addresses feed the per-client rate limiter
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    if let Err(e) = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Shutting down...");
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
