// Entry point for the authentication authority

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use tasks_service::auth::authority::{create_authority_router, CredentialRegistry};
use tasks_service::config::AuthorityConfig;
use tasks_service::utils::logging::init_tracing;
use tasks_service::utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match AuthorityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level, &config.log_format).map_err(anyhow::Error::msg)?;

    let registry = Arc::new(CredentialRegistry::from_pairs(config.credentials.clone()));
    if registry.is_empty() {
        anyhow::bail!("No credentials configured for the authority");
    }
    info!(credentials = registry.len(), "Credential registry loaded");

    let router = create_authority_router(registry);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "Authentication authority listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
