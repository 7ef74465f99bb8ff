use std::sync::Arc;
use studio_platform_access::PolicyGate;
use studio_server::{app, auth::AppState, config::ServerConfig, store::MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from studio.toml and the environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(
        mandatory_policies = config.policies.mandatory().len(),
        "Loaded configuration"
    );

    let policies = PolicyGate::new(config.policies).expect("invalid policy configuration");
    let store = Arc::new(MemoryStore::new());

    // Spawn periodic session cleanup task
    let cleanup_store = store.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let count = cleanup_store.delete_expired().await;
            if count > 0 {
                tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
            }
        }
    });

    let app_state = Arc::new(AppState::new(store, policies, config.session));
    let app = app::router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_address);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
