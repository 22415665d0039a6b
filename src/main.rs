// Main entry point for the tasks service

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use tasks_service::api::{create_router, AppState};
use tasks_service::auth::audit_logger::AuditLogger;
use tasks_service::auth::auth_middleware::AuthState;
use tasks_service::auth::verifier::HttpCredentialVerifier;
use tasks_service::config::Config;
use tasks_service::store::TaskLog;
use tasks_service::utils::logging::init_tracing;
use tasks_service::utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config.log_level, &config.log_format).map_err(anyhow::Error::msg)?;

    info!(
        bind_address = %config.bind_address,
        port = config.port,
        tasks_file = %config.tasks_file_path().display(),
        auth_address = %config.auth_address,
        auth_timeout_ms = config.auth_timeout_ms,
        "Configuration loaded"
    );

    // 3. Task log
    let task_log = Arc::new(TaskLog::new(config.tasks_file_path()));

    // 4. Verifier client for the authority
    let verifier = Arc::new(
        HttpCredentialVerifier::new(config.auth_base_url()?, config.auth_timeout())
            .context("Failed to create credential verifier")?,
    );

    // 5. Credential gate
    let auth_state = Arc::new(AuthState::new(
        verifier,
        Arc::new(AuditLogger::new()),
        config.gate_timeout(),
    ));

    let app_state = AppState {
        task_store: task_log,
        config: Arc::new(config.clone()),
    };

    // 6. Router
    let router = create_router(&app_state, auth_state).with_state(app_state);

    // 7. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Tasks service listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
