//! Intake bot backend
//!
//! A Rust backend implementing a scripted intake conversation state machine
//! over a chat transport, with durable per-chat state and an administrative
//! JSON surface.

mod admission;
mod api;
mod config;
mod runtime;
mod state_machine;
mod store;
mod validators;

use api::{create_router, AdminCredentials, AppState};
use config::Config;
use runtime::RuntimeManager;
use std::net::SocketAddr;
use std::sync::Arc;
use store::StateStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Initialize store
    tracing::info!(path = %config.state_path.display(), "Opening state store");
    let store = Arc::new(StateStore::open(&config.state_path, &config.history_path));
    let stats = store.stats();
    tracing::info!(
        total_users = stats.total_users,
        human_mode_users = stats.human_mode_users,
        history_records = stats.total_history_records,
        "State store ready"
    );

    // Create the per-chat runtime and application state
    let runtime = Arc::new(RuntimeManager::new(
        store,
        config.business_hours.clone(),
        config.admin_ids.clone(),
    ));
    let state = AppState::new(
        runtime,
        AdminCredentials {
            username: config.web_username.clone(),
            password: config.web_password.clone(),
        },
    );

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Intake bot admin surface listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
