use skillbridge_web::{
    AppState, HttpProfileService, ProfileState,
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, wires the backend client and
/// serves the gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible local defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "skillbridge_web=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 3. Backend client. Its timeout outlasts the loading threshold, so a slow
    // fetch keeps running after the visitor has been shown the loading view.
    let profiles = HttpProfileService::new(&config.api_base_url, config.api_timeout)
        .expect("FATAL: Failed to build the HTTP client for the SkillBridge API.");
    let profiles = Arc::new(profiles) as ProfileState;
    tracing::info!(api = %config.api_base_url, "Profile lookups go to the SkillBridge API");

    // 4. Router and server
    let listen_addr = config.listen_addr.clone();
    let app = create_router(AppState::new(profiles, config));

    let listener = TcpListener::bind(&listen_addr)
        .await
        .expect("FATAL: Failed to bind the listen address.");

    tracing::info!("Listening on {}", listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server terminated");
    }
}
